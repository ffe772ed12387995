use core::{
    cell::UnsafeCell,
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
};

use super::irq::IrqControl;

/// IRQ-safe spinlock.
///
/// - Disables interrupts on lock
/// - Spins until acquired (`lock`) or gives up immediately (`try_lock`)
/// - Restores interrupt state on drop
///
/// Task context takes it with `lock`; while held, the local interrupt
/// handler cannot preempt the holder. Interrupt context must only use
/// `try_lock`.
///
/// Not fair. Not reentrant.
pub struct IrqSpinLock<T, I: IrqControl> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
    _irq: PhantomData<I>,
}

unsafe impl<T: Send, I: IrqControl> Send for IrqSpinLock<T, I> {}
unsafe impl<T: Send, I: IrqControl> Sync for IrqSpinLock<T, I> {}

impl<T, I: IrqControl> IrqSpinLock<T, I> {
    /// Create a new IRQ-safe spinlock.
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
            _irq: PhantomData,
        }
    }

    /// Acquire the lock with interrupts disabled.
    pub fn lock(&self) -> IrqSpinLockGuard<'_, T, I> {
        let irq_state = I::disable();

        while self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        IrqSpinLockGuard {
            lock: self,
            irq_state,
        }
    }

    /// Acquire the lock only if it is free right now.
    ///
    /// On contention the interrupt state is restored and `None` is returned.
    pub fn try_lock(&self) -> Option<IrqSpinLockGuard<'_, T, I>> {
        let irq_state = I::disable();

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(IrqSpinLockGuard {
                lock: self,
                irq_state,
            })
        } else {
            I::restore(irq_state);
            None
        }
    }
}

/// Guard returned by `IrqSpinLock::lock` and `IrqSpinLock::try_lock`.
///
/// Restores interrupt state on drop.
pub struct IrqSpinLockGuard<'a, T, I: IrqControl> {
    lock: &'a IrqSpinLock<T, I>,
    irq_state: I::State,
}

impl<'a, T, I: IrqControl> core::ops::Deref for IrqSpinLockGuard<'a, T, I> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.lock.data.get() }
    }
}

impl<'a, T, I: IrqControl> core::ops::DerefMut for IrqSpinLockGuard<'a, T, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<'a, T, I: IrqControl> Drop for IrqSpinLockGuard<'a, T, I> {
    fn drop(&mut self) {
        // Release lock first
        self.lock.locked.store(false, Ordering::Release);

        I::restore(self.irq_state);
    }
}
