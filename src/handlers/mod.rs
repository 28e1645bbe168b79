pub mod get;
pub mod health;
pub mod set;
pub mod value;

pub use get::get_handler;
pub use health::health_handler;
pub use set::set_handler;
pub use value::value_handler;
