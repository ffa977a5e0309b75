pub mod constants;
mod script;
mod wait_for_element;

pub use script::{eval, eval_json};
pub use wait_for_element::wait_for_element;
