//! Type-level capability checks deciding whether a call may be offloaded.
//!
//! Every verdict here is a function of types only: associated constants and
//! `const fn`s that the compiler folds when it monomorphizes a call, so the
//! router's choice between the device path and the host fallback costs
//! nothing at run time and never depends on input size.

use std::collections::{BTreeSet, LinkedList, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::mem;

/// Largest callable state, in bytes, that can ride along as a kernel argument.
pub const MAX_KERNEL_ARG_BYTES: usize = 4096;

/// Traversal strength of a sequence, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IteratorCategory {
    Forward,
    Bidirectional,
    RandomAccess,
    /// Random access over one contiguous allocation.
    Contiguous,
}

impl IteratorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            IteratorCategory::Forward => "forward",
            IteratorCategory::Bidirectional => "bidirectional",
            IteratorCategory::RandomAccess => "random_access",
            IteratorCategory::Contiguous => "contiguous",
        }
    }

    /// Only pointer-like contiguous storage can be handed to the device.
    pub const fn is_offloadable(self) -> bool {
        matches!(self, IteratorCategory::Contiguous)
    }
}

impl fmt::Display for IteratorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Random-access view used by the host fallback.
///
/// Contiguous inputs are borrowed as-is; everything else is gathered into a
/// vector of references first so rayon can split it by index.
#[derive(Debug)]
pub enum HostView<'a, T> {
    Slice(&'a [T]),
    Gathered(Vec<&'a T>),
}

impl<'a, T> HostView<'a, T> {
    pub fn len(&self) -> usize {
        match self {
            HostView::Slice(s) => s.len(),
            HostView::Gathered(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> &'a T {
        match self {
            HostView::Slice(s) => &s[index],
            HostView::Gathered(v) => v[index],
        }
    }
}

/// A finite sequence an algorithm can run over: the `[first, last)` range.
///
/// Positions are offsets from the start; `len()` is the end-of-range
/// position and doubles as the "not found" sentinel.
pub trait Sequence {
    type Item: Sync;

    const CATEGORY: IteratorCategory;

    /// Capability verdict for this sequence type.
    const OFFLOADABLE: bool = Self::CATEGORY.is_offloadable();

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The backing storage, for sequences that have one.
    fn as_contiguous(&self) -> Option<&[Self::Item]>;

    fn host_view(&self) -> HostView<'_, Self::Item>;
}

macro_rules! contiguous_sequence {
    ($(impl<$lt:lifetime, T $(, const $n:ident: usize)?> for $ty:ty;)*) => {$(
        impl<$lt, T: Sync $(, const $n: usize)?> Sequence for $ty {
            type Item = T;
            const CATEGORY: IteratorCategory = IteratorCategory::Contiguous;

            fn len(&self) -> usize {
                <[T]>::len(&self[..])
            }

            fn as_contiguous(&self) -> Option<&[T]> {
                Some(&self[..])
            }

            fn host_view(&self) -> HostView<'_, T> {
                HostView::Slice(&self[..])
            }
        }
    )*};
}

contiguous_sequence! {
    impl<'a, T> for &'a [T];
    impl<'a, T> for &'a Vec<T>;
    impl<'a, T, const N: usize> for &'a [T; N];
}

macro_rules! gathered_sequence {
    ($(impl<$lt:lifetime, T> for $ty:ty => $cat:ident;)*) => {$(
        impl<$lt, T: Sync> Sequence for $ty {
            type Item = T;
            const CATEGORY: IteratorCategory = IteratorCategory::$cat;

            fn len(&self) -> usize {
                (**self).len()
            }

            fn as_contiguous(&self) -> Option<&[T]> {
                None
            }

            fn host_view(&self) -> HostView<'_, T> {
                HostView::Gathered(self.iter().collect())
            }
        }
    )*};
}

gathered_sequence! {
    impl<'a, T> for &'a VecDeque<T> => RandomAccess;
    impl<'a, T> for &'a LinkedList<T> => Bidirectional;
    impl<'a, T> for &'a BTreeSet<T> => Bidirectional;
}

/// Any cloneable iterator of references, treated as a forward-only range.
///
/// Computing its length walks it once; the fallback walks it again to
/// gather positions.
#[derive(Debug, Clone)]
pub struct Forward<'a, I> {
    iter: I,
    items: PhantomData<&'a ()>,
}

impl<'a, I> Forward<'a, I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            items: PhantomData,
        }
    }
}

impl<'a, T, I> Sequence for Forward<'a, I>
where
    T: Sync + 'a,
    I: Iterator<Item = &'a T> + Clone,
{
    type Item = T;
    const CATEGORY: IteratorCategory = IteratorCategory::Forward;

    fn len(&self) -> usize {
        self.iter.clone().count()
    }

    fn as_contiguous(&self) -> Option<&[T]> {
        None
    }

    fn host_view(&self) -> HostView<'_, T> {
        HostView::Gathered(self.iter.clone().collect())
    }
}

/// Verdict for a single sequence type.
pub const fn is_offloadable_sequence<S: Sequence>() -> bool {
    S::OFFLOADABLE
}

/// Verdict for two sequence types used together.
pub const fn offloadable_pair<A: Sequence, B: Sequence>() -> bool {
    A::OFFLOADABLE && B::OFFLOADABLE
}

/// Verdict for a callable type.
///
/// The callable is replicated bitwise into every work item, so it must not
/// own anything with drop glue (heap buffers, reference counts, locks) and
/// its state must fit in a kernel argument. Borrowed captures are fine: the
/// device shares the host's address space.
pub const fn is_offloadable_callable<F>() -> bool {
    !mem::needs_drop::<F>() && mem::size_of::<F>() <= MAX_KERNEL_ARG_BYTES
}

/// The path a call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Offload,
    Fallback,
}

impl Route {
    pub const fn from_verdict(offloadable: bool) -> Self {
        if offloadable {
            Route::Offload
        } else {
            Route::Fallback
        }
    }
}

/// Route for a sequence combined with a callable. A rejected callable forces
/// the fallback even when the sequence qualifies.
pub const fn route_with<S: Sequence, F>() -> Route {
    Route::from_verdict(S::OFFLOADABLE && is_offloadable_callable::<F>())
}
