//! Generated gRPC bindings for the MAAS orchestration wire contract.
//!
//! The protobuf sources live under `proto/` and are compiled by `build.rs`
//! with `tonic-build`. Everything in `maasagent.v1` is re-exported at the
//! crate root.

pub mod maasagent {
    pub mod v1 {
        tonic::include_proto!("maasagent.v1");
    }
}

pub use maasagent::v1::*;
