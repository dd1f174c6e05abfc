pub mod smoother;
pub mod state;
