pub mod bench_tasks;
pub mod masking;
pub mod msidh;
pub mod parameters;
pub mod public_key;
pub mod tersidh;

/// Which side of the key exchange a session plays. Bob swaps the roles of
/// the degrees A and B.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Alice,
    Bob,
}

/// Progress of a protocol session. States only move forward, except through
/// `reset()` which returns to `KernelComputed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionStatus {
    Init,
    BasisReady,
    KernelComputed,
    PublicKeyReady,
    KeyExchanged,
}
