//! Process-wide BLAKE3 compression backend choice.

use platform::Caps;

#[cfg(feature = "std")]
use super::kernels::id_from_name;
use super::kernels::{Blake3KernelId, Kernel, kernel as kernel_for_id, required_caps};

/// Environment variable naming a backend to use instead of the automatic pick.
pub const KERNEL_ENV: &str = "FERROHASH_BLAKE3_KERNEL";

#[cfg(feature = "std")]
static ACTIVE: std::sync::OnceLock<Kernel> = std::sync::OnceLock::new();

#[must_use]
pub fn select(caps: Caps) -> Blake3KernelId {
  #[cfg(target_arch = "x86_64")]
  {
    if caps.has(required_caps(Blake3KernelId::X86Sse41)) {
      return Blake3KernelId::X86Sse41;
    }
  }
  let _ = caps;
  Blake3KernelId::Portable
}

#[cfg(feature = "std")]
fn pinned(caps: Caps) -> Option<Blake3KernelId> {
  let name = std::env::var(KERNEL_ENV).ok()?;
  let name = name.trim();
  let Some(id) = id_from_name(name) else {
    log::warn!("{KERNEL_ENV}={name:?} is not a blake3 backend on this target; ignoring");
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

#[cfg(feature = "std")]
fn resolve() -> Kernel {
  let caps = platform::caps();
  let id = match pinned(caps) {
    Some(id) => {
      log::debug!("blake3 backend {id} (pinned by {KERNEL_ENV})");
      id
    }
    None => {
      let id = select(caps);
      log::debug!("blake3 backend {id} (best for {})", platform::describe());
      id
    }
  };
  kernel_for_id(id)
}

#[inline]
pub(crate) fn kernel() -> Kernel {
  #[cfg(feature = "std")]
  {
    *ACTIVE.get_or_init(resolve)
  }

  #[cfg(not(feature = "std"))]
  {
    kernel_for_id(select(platform::caps()))
  }
}

/// The backend every new hasher uses.
#[inline]
#[must_use]
pub fn active_kernel() -> Blake3KernelId {
  kernel().id
}
