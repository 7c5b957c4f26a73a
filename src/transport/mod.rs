//! BLE transport abstraction layer

pub mod ble_central;
pub mod bluer_central;
pub mod mock_central;

pub use ble_central::{BleCentral, Notifications};
pub use bluer_central::BluerCentral;

#[cfg(test)]
pub use mock_central::MockBleCentral;
