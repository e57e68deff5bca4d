use super::ParallelFor;

/// Sequential reference backend. Runs every band on the calling thread, in
/// band order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarBackend;

impl ParallelFor for ScalarBackend {
    fn for_each_slot<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        for (index, slot) in slots.iter_mut().enumerate() {
            f(index, slot);
        }
    }
}
