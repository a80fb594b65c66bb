pub mod config;
pub mod report;
pub mod rules;
pub mod scorer;
pub mod weights;


pub use config::*;
pub use report::*;
pub use rules::*;
pub use scorer::*;
pub use weights::*;
