pub mod error;
pub mod machine;
pub mod programs;
pub mod protocol;
