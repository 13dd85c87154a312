use ringlock::{RingBuffer, RingBufferError};

#[test]
fn basic_single_thread_roundtrip() {
    let rb = RingBuffer::new(1024).unwrap();

    let mut w = rb.write_start().expect("write");
    assert_eq!(w.write(b"hello"), Ok(5));
    assert_eq!(w.end(), 5);

    let mut r = rb.read_start().expect("read");
    assert_eq!(r.budget(), 5);
    let mut out = [0u8; 5];
    assert_eq!(r.read(&mut out), Ok(5));
    assert_eq!(&out, b"hello");
    assert_eq!(r.end(), 5);
}

#[test]
fn wrap_splits_copy_at_boundary() {
    let rb = RingBuffer::<u32>::new(8).unwrap();

    let mut w = rb.write_start().unwrap();
    assert_eq!(w.budget(), 8);
    assert_eq!(w.write(&[1, 2, 3, 4, 5]), Ok(5));
    assert_eq!(w.end(), 5);

    let mut out = [0u32; 3];
    let mut r = rb.read_start().unwrap();
    assert_eq!(r.read(&mut out), Ok(3));
    assert_eq!(out, [1, 2, 3]);
    assert_eq!(r.end(), 3);

    // Lands in slots 5, 6, 7, 0, 1, 2
    let mut w = rb.write_start().unwrap();
    assert_eq!(w.budget(), 6);
    assert_eq!(w.write(&[6, 7, 8, 9, 10, 11]), Ok(6));
    w.end();
    assert!(rb.is_full());

    let mut out = [0u32; 8];
    assert_eq!(rb.read(&mut out), Ok(8));
    assert_eq!(out, [4, 5, 6, 7, 8, 9, 10, 11]);
}

#[test]
fn sizes_always_sum_to_capacity() {
    let rb = RingBuffer::<u16>::new(5).unwrap();
    let mut out = [0u16; 3];

    for step in 0..12u16 {
        if step % 3 == 2 {
            let _ = rb.read(&mut out);
        } else {
            let _ = rb.write(&[step, step]);
        }
        assert_eq!(rb.write_size() + rb.read_size(), rb.capacity());
    }
}

#[test]
fn streaming_writes_across_transactions() {
    let rb = RingBuffer::<u8>::new(4).unwrap();
    let payload: Vec<u8> = (0..10).collect();
    let mut received = Vec::new();
    let mut sent = 0;

    while received.len() < payload.len() {
        if let Some(mut w) = rb.write_start() {
            if sent < payload.len() {
                sent += w.write(&payload[sent..]).unwrap();
            }
            w.end();
        }
        let mut out = [0u8; 3];
        if let Ok(n) = rb.read(&mut out) {
            received.extend_from_slice(&out[..n]);
        }
    }

    assert_eq!(received, payload);
}

#[test]
fn one_shot_reports_truncation_not_error() {
    let rb = RingBuffer::new(3).unwrap();
    assert_eq!(rb.write(&[1i64, 2, 3, 4]), Ok(3));
    assert_eq!(rb.write(&[5]), Err(RingBufferError::Full));

    let mut out = [0i64; 2];
    assert_eq!(rb.read(&mut out), Ok(2));
    assert_eq!(rb.write(&[5, 6, 7]), Ok(2));

    let mut out = [0i64; 4];
    assert_eq!(rb.read(&mut out), Ok(3));
    assert_eq!(&out[..3], &[3, 5, 6]);
}

#[test]
fn invalid_transfers_leave_buffer_untouched() {
    let rb = RingBuffer::<u8>::new(4).unwrap();
    rb.write(&[1, 2]).unwrap();

    let mut w = rb.write_start().unwrap();
    assert_eq!(w.write(&[]), Err(RingBufferError::InvalidArgument));
    assert_eq!(w.end(), 0);

    let mut r = rb.read_start().unwrap();
    assert_eq!(r.read(&mut []), Err(RingBufferError::InvalidArgument));
    assert_eq!(r.end(), 0);

    assert_eq!(rb.read_size(), 2);
    let mut out = [0u8; 2];
    assert_eq!(rb.read(&mut out), Ok(2));
    assert_eq!(out, [1, 2]);
}

#[test]
fn raw_tier_leaves_lock_to_caller() {
    let rb = RingBuffer::<u8>::new(4).unwrap();

    let mut locked = rb.lock();
    assert_eq!(locked.write_start(), 4);
    assert_eq!(locked.write(&[1, 2, 3]), Ok(3));
    assert_eq!(locked.write_end(), 3);
    assert!(rb.try_lock().is_none());

    assert_eq!(locked.read_start(), 3);
    let mut out = [0u8; 2];
    assert_eq!(locked.peek(&mut out), Ok(2));
    assert_eq!(locked.read(&mut out), Ok(2));
    assert_eq!(out, [1, 2]);
    assert_eq!(locked.read_end(), 2);
    locked.unlock();

    assert!(rb.try_lock().is_some());
    assert_eq!(rb.read_size(), 1);
}
