mod mock_adguard;

pub use mock_adguard::*;
