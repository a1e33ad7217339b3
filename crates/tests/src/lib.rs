pub mod fixtures;

#[cfg(test)]
mod presence_tests;
#[cfg(test)]
mod room_state_tests;
#[cfg(test)]
mod signaling_tests;
#[cfg(test)]
mod summary_tests;
