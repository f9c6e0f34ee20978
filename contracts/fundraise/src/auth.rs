//! Off-chain signer authorization for the investment intake.
//!
//! The trusted backend signs the XDR encoding of [`InvestAuthorization`]
//! with its ed25519 key; the contract verifies the signature against the
//! stored public key. That signature is the sole admission gate for
//! `invest_update` — it stands in for inline Merkle-proof verification of
//! the whitelist.

use soroban_sdk::{contracttype, xdr::ToXdr, Address, Bytes, BytesN, Env};

/// The exact payload the trusted signer commits to: one caller, one
/// project, one amount, one root rotation, one nonce, one inviter.
#[contracttype]
#[derive(Clone, Debug)]
pub struct InvestAuthorization {
    pub investor: Address,
    pub project_id: u64,
    pub amount: i128,
    pub whitelist_root: BytesN<32>,
    pub nonce: u64,
    pub inviter: Option<Address>,
}

pub fn message_bytes(env: &Env, authorization: &InvestAuthorization) -> Bytes {
    authorization.clone().to_xdr(env)
}

/// Panics with a host crypto error on signature mismatch, aborting the
/// enclosing call before any state is touched beyond the nonce read.
pub fn verify(
    env: &Env,
    signer: &BytesN<32>,
    authorization: &InvestAuthorization,
    signature: &BytesN<64>,
) {
    let message = message_bytes(env, authorization);
    env.crypto().ed25519_verify(signer, &message, signature);
}
