/// Raw storage for vertex data, usually living on the GPU.
pub trait BufferStorage {
    /// Replaces the storage with a new allocation holding exactly `data`.
    fn reallocate(&mut self, data: &[u8]);

    /// Overwrites the start of the existing allocation with `data`.
    fn write(&mut self, data: &[u8]);
}

///
/// Wraps a `BufferStorage` so that it only ever grows.
///
/// Uploads that fit into the largest allocation made so far reuse it; anything larger
/// reallocates to exactly the new size.
///
pub struct GrowableBuffer<S> {
    storage: S,
    capacity: usize,
}

impl<S: BufferStorage> GrowableBuffer<S> {
    pub fn new(storage: S) -> GrowableBuffer<S> {
        GrowableBuffer { storage, capacity: 0 }
    }

    /// Size in bytes of the current allocation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn upload(&mut self, data: &[u8]) {
        if data.len() > self.capacity {
            log::debug!("growing vertex buffer from {} to {} bytes", self.capacity, data.len());
            self.storage.reallocate(data);
            self.capacity = data.len();
        } else if !data.is_empty() {
            self.storage.write(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        reallocations: Vec<usize>,
        writes: Vec<usize>,
    }

    impl BufferStorage for Recording {
        fn reallocate(&mut self, data: &[u8]) {
            self.reallocations.push(data.len());
        }

        fn write(&mut self, data: &[u8]) {
            self.writes.push(data.len());
        }
    }

    #[test]
    fn grows_only_past_high_water_mark() {
        let mut buffer = GrowableBuffer::new(Recording::default());

        buffer.upload(&[0; 64]);
        buffer.upload(&[0; 32]);
        buffer.upload(&[0; 64]);
        assert_eq!(buffer.storage().reallocations, vec![64]);
        assert_eq!(buffer.storage().writes, vec![32, 64]);

        buffer.upload(&[0; 96]);
        assert_eq!(buffer.storage().reallocations, vec![64, 96]);
        assert_eq!(buffer.capacity(), 96);
    }

    #[test]
    fn empty_upload_touches_nothing() {
        let mut buffer = GrowableBuffer::new(Recording::default());
        buffer.upload(&[]);
        assert!(buffer.storage().reallocations.is_empty());
        assert!(buffer.storage().writes.is_empty());
    }
}
