// Loading of CMVN statistics (negative mean / inverse std) from Kaldi-nnet
// style `am.mvn` artifacts, plus the per-dimension normalizer that uses them.

pub mod cli;
pub mod cmvn;
pub mod config;
pub mod error;
pub mod normalizer;

pub use cmvn::{load_cmvn, parse_cmvn, Block, CmvnParser, CmvnStats};
pub use config::FrontendConfig;
pub use error::{CmvnError, PayloadFault};
pub use normalizer::Cmvn;
