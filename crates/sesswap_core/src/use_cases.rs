mod accounts;
mod switch;

pub use accounts::AccountManager;
pub use switch::SessionSwitch;
