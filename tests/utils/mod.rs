mod actions;
mod assertions;
mod mocks;
mod setup;

pub use mocks::MockConnectionManager;
pub use setup::TestSetup;
