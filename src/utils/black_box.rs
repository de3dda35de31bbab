pub trait BlackBox {
    /// Prevents the compiler from reasoning about the value of `x`.
    fn black_box(x: Self) -> Self;
}

macro_rules! black_box_impl {
    ($ty:ty, $reg:ident) => {
        impl BlackBox for $ty {
            #[inline(always)]
            #[allow(asm_sub_register)]
            #[allow(unused_mut)]
            fn black_box(mut x: $ty) -> $ty {
                #[cfg(asm_barrier)]
                unsafe {
                    core::arch::asm!("/* {x} */", x = inout($reg) x, options(nomem, nostack, preserves_flags, pure));
                }
                #[cfg(all(not(asm_barrier), hint_black_box))]
                {
                    x = core::hint::black_box(x);
                }
                #[cfg(all(not(asm_barrier), not(hint_black_box)))]
                {
                    // SAFETY: `x` is a live local, reading it back is always valid.
                    x = unsafe { core::ptr::read_volatile(&x) };
                }
                x
            }
        }
    };
}

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        black_box_impl!(u8, reg_byte);
    } else {
        black_box_impl!(u8, reg);
    }
}

black_box_impl!(u32, reg);

#[inline(always)]
pub fn black_box<T>(x: T) -> T
where
    T: BlackBox,
{
    T::black_box(x)
}
