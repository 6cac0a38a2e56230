mod mock_appliance;

pub use mock_appliance::*;
