// Anchor discriminators: the first 8 bytes of a namespaced SHA-256 digest.

use sha2::{Digest, Sha256};

pub const DISCRIMINATOR_LEN: usize = 8;

// Namespaces Anchor uses when hashing instruction and account names.
const INSTRUCTION_NAMESPACE: &str = "global";
const ACCOUNT_NAMESPACE: &str = "account";

fn namespaced_digest(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Discriminator prefixed to the data of an instruction, e.g. `create_blink`.
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_digest(INSTRUCTION_NAMESPACE, name)
}

/// Discriminator stored at the start of an account, e.g. `BlinkList`.
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_digest(ACCOUNT_NAMESPACE, name)
}
