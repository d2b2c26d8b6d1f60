//! Shared helpers used across the pipeline.

pub mod telemetry;

use std::collections::VecDeque;

/// Copy the front of a deque into a contiguous slice, handling wraparound.
#[inline]
pub fn copy_from_deque<T: Copy>(dst: &mut [T], src: &VecDeque<T>) {
    let len = dst.len().min(src.len());
    let (head, tail) = src.as_slices();
    if head.len() >= len {
        dst[..len].copy_from_slice(&head[..len]);
    } else {
        let split = head.len();
        dst[..split].copy_from_slice(head);
        dst[split..len].copy_from_slice(&tail[..len - split]);
    }
}

#[cfg(test)]
mod tests {
    use super::copy_from_deque;
    use std::collections::VecDeque;

    #[test]
    fn copies_across_the_ring_seam() {
        let mut deque: VecDeque<u32> = VecDeque::with_capacity(4);
        deque.extend([1, 2, 3, 4]);
        deque.pop_front();
        deque.pop_front();
        deque.push_back(5);
        deque.push_back(6);

        let mut out = [0u32; 4];
        copy_from_deque(&mut out, &deque);
        assert_eq!(out, [3, 4, 5, 6]);
    }
}
