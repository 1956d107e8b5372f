//! Per-frame instance data in a vertex buffer that grows on demand.

use std::marker::PhantomData;

/// Smallest allocation, in instances.
const MIN_INSTANCES: usize = 64;

/// A vertex buffer of `T` instances rewritten every frame.
///
/// Capacity only grows; the old allocation is destroyed when it does.
pub struct InstanceBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    label: &'static str,
    _instance: PhantomData<T>,
}

impl<T: bytemuck::Pod> InstanceBuffer<T> {
    /// Room for at least `capacity` instances.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(MIN_INSTANCES);
        Self {
            buffer: allocate::<T>(device, label, capacity),
            capacity,
            count: 0,
            label,
            _instance: PhantomData,
        }
    }

    /// Replace the contents with `instances`. Returns whether the buffer
    /// had to be reallocated.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[T],
    ) -> bool {
        let reallocated = instances.len() > self.capacity;
        if reallocated {
            self.capacity = grown_capacity(instances.len(), self.capacity);
            self.buffer.destroy();
            self.buffer = allocate::<T>(device, self.label, self.capacity);
            log::debug!("{} grew to {} instances", self.label, self.capacity);
        }
        if !instances.is_empty() {
            let bytes = bytemuck::cast_slice(instances);
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.count = instances.len();
        reallocated
    }

    /// The wgpu buffer to bind as a vertex stream.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Instances written by the last upload.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Free the GPU allocation.
    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}

fn allocate<T>(
    device: &wgpu::Device,
    label: &str,
    capacity: usize,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * size_of::<T>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Next capacity able to hold `needed` instances: a power of two, at least
/// double the current one.
fn grown_capacity(needed: usize, capacity: usize) -> usize {
    needed.next_power_of_two().max(capacity.saturating_mul(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_at_least_doubles() {
        assert_eq!(grown_capacity(65, 64), 128);
        assert_eq!(grown_capacity(300, 64), 512);
        assert_eq!(grown_capacity(129, 128), 256);
    }

    #[test]
    fn growth_covers_large_jumps() {
        let grown = grown_capacity(5_000, 64);
        assert!(grown >= 5_000);
        assert!(grown.is_power_of_two());
    }
}
