//! Support code for the `kube-patch` command.
pub mod input;
