//! Low-complexity filters and their numeric tables.

pub mod lnfact;
pub mod pam;
pub mod seg;
pub mod xnu;

pub use lnfact::ln_fact;
pub use pam::Pam;
pub use seg::{Seg, SegParams};
pub use xnu::{Xnu, XnuParams};
