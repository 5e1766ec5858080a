// Core modules implementing marshalling, the nfd boundary, and error modeling.
pub mod decode;
pub mod dialog;
pub mod error;
pub mod filter;
pub mod nfd;
pub mod outcome;
pub mod text;
