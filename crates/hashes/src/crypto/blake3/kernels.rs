use platform::Caps;

pub(crate) type CompressFn = fn(&[u32; 8], &[u32; 16], u64, u32, u32) -> [u32; 16];

#[derive(Clone, Copy)]
pub(crate) struct Kernel {
  pub(crate) id: Blake3KernelId,
  pub(crate) compress: CompressFn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Blake3KernelId {
  Portable = 0,
  #[cfg(target_arch = "x86_64")]
  X86Sse41 = 1,
}

#[cfg(target_arch = "x86_64")]
pub const ALL: &[Blake3KernelId] = &[Blake3KernelId::Portable, Blake3KernelId::X86Sse41];

#[cfg(not(target_arch = "x86_64"))]
pub const ALL: &[Blake3KernelId] = &[Blake3KernelId::Portable];

impl Blake3KernelId {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      #[cfg(target_arch = "x86_64")]
      Self::X86Sse41 => "x86-sse4.1",
    }
  }
}

impl core::fmt::Display for Blake3KernelId {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[must_use]
pub fn id_from_name(name: &str) -> Option<Blake3KernelId> {
  ALL.iter().copied().find(|id| id.as_str() == name)
}

/// Caller must have checked [`required_caps`] against the running CPU.
#[must_use]
pub(crate) fn kernel(id: Blake3KernelId) -> Kernel {
  match id {
    Blake3KernelId::Portable => Kernel {
      id,
      compress: super::compress_portable,
    },
    #[cfg(target_arch = "x86_64")]
    Blake3KernelId::X86Sse41 => Kernel {
      id,
      compress: super::x86_64::compress_sse41,
    },
  }
}

#[inline]
#[must_use]
pub const fn required_caps(id: Blake3KernelId) -> Caps {
  match id {
    Blake3KernelId::Portable => Caps::NONE,
    #[cfg(target_arch = "x86_64")]
    Blake3KernelId::X86Sse41 => platform::caps::x86::SSE41_READY,
  }
}
