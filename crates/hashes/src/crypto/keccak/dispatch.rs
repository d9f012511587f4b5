//! Process-wide Keccak-f[1600] backend choice.
//!
//! Resolved once from the detected capabilities (plus an optional
//! `FERROHASH_KECCAK_KERNEL` pin) and cached for the life of the process.

use platform::Caps;

#[cfg(feature = "std")]
use super::kernels::id_from_name;
use super::kernels::{KeccakKernelId, PermuteFn, permute_fn_unchecked, required_caps};

/// Environment variable naming a backend to use instead of the automatic pick.
pub const KERNEL_ENV: &str = "FERROHASH_KECCAK_KERNEL";

#[derive(Clone, Copy)]
struct Active {
  id: KeccakKernelId,
  permute: PermuteFn,
}

#[cfg(feature = "std")]
static ACTIVE: std::sync::OnceLock<Active> = std::sync::OnceLock::new();

/// Best backend the given capabilities allow.
///
/// `Compact` is never chosen here; it only runs when pinned by name.
#[must_use]
pub fn select(caps: Caps) -> KeccakKernelId {
  #[cfg(target_arch = "x86_64")]
  {
    if caps.has(required_caps(KeccakKernelId::X86Avx2)) {
      return KeccakKernelId::X86Avx2;
    }
  }
  #[cfg(target_arch = "aarch64")]
  {
    if caps.has(required_caps(KeccakKernelId::Aarch64Sha3)) {
      return KeccakKernelId::Aarch64Sha3;
    }
  }
  let _ = caps;
  KeccakKernelId::Portable
}

#[cfg(feature = "std")]
fn pinned(caps: Caps) -> Option<KeccakKernelId> {
  let name = std::env::var(KERNEL_ENV).ok()?;
  let name = name.trim();
  let Some(id) = id_from_name(name) else {
    log::warn!("{KERNEL_ENV}={name:?} is not a keccak backend on this target; ignoring");
    return None;
  };
  let need = required_caps(id);
  if !caps.has(need) {
    log::warn!(
      "{KERNEL_ENV}={name:?} needs {:?} which this CPU lacks; ignoring",
      need.difference(caps)
    );
    return None;
  }
  Some(id)
}

fn resolve() -> Active {
  let caps = platform::caps();

  #[cfg(feature = "std")]
  let id = match pinned(caps) {
    Some(id) => {
      log::debug!("keccak-f[1600] backend {id} (pinned by {KERNEL_ENV})");
      id
    }
    None => {
      let id = select(caps);
      log::debug!("keccak-f[1600] backend {id} (best for {})", platform::describe());
      id
    }
  };

  #[cfg(not(feature = "std"))]
  let id = select(caps);

  Active {
    id,
    permute: permute_fn_unchecked(id),
  }
}

#[inline]
fn active() -> Active {
  #[cfg(feature = "std")]
  {
    *ACTIVE.get_or_init(resolve)
  }

  #[cfg(not(feature = "std"))]
  {
    resolve()
  }
}

/// The backend every new sponge uses.
#[inline]
#[must_use]
pub fn active_kernel() -> KeccakKernelId {
  active().id
}

#[inline]
pub(crate) fn permute_fn() -> PermuteFn {
  active().permute
}
