//! Infrastructure shared by the PSL and DMARC modules.

pub mod dns;
