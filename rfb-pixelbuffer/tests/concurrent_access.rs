//! Producer/consumer tests for the shared pixel store.
//!
//! One thread plays the decode producer, the test thread plays the paint
//! path. Every snapshot must show each rectangle fully old or fully new.

use proptest::prelude::*;
use rfb_common::{Dimension, Rect};
use rfb_pixelbuffer::{PixelFormat, PixelStore, PixelStoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_reader_never_sees_torn_rectangle() {
    let store = Arc::new(PixelStore::with_dimension(
        PixelFormat::rgb888(),
        Dimension::new(256, 256),
    ));
    let rect = Rect::new(16, 16, 200, 200);
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let frames = [
                vec![0x11u8; rect.area() as usize * 4],
                vec![0xEEu8; rect.area() as usize * 4],
            ];
            for i in 0..500 {
                store.write(rect, &frames[i % 2], 0).unwrap();
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut reads = 0;
    while !done.load(Ordering::Acquire) || reads == 0 {
        let snapshot = store.read_region(rect);
        let first = snapshot.data()[0];
        assert!(
            snapshot.data().iter().all(|&b| b == first),
            "torn read observed"
        );
        reads += 1;
    }

    writer.join().unwrap();
}

#[test]
fn test_write_racing_resize_is_rejected() {
    let store = Arc::new(PixelStore::with_dimension(
        PixelFormat::rgb888(),
        Dimension::new(100, 100),
    ));

    // The producer shrinks the screen; a stale write for the old size fails.
    store.resize(Dimension::new(40, 40));
    let stale = Rect::new(50, 50, 10, 10);
    let result = store.write(stale, &vec![0xFF; 400], 0);
    assert!(matches!(result, Err(PixelStoreError::OutOfBounds { .. })));

    // After observing the new size the retry lands inside.
    let retry = Rect::new(30, 30, 10, 10);
    store.write(retry, &vec![0xFF; 400], 0).unwrap();
    assert_eq!(store.read_region(retry).pixel(35, 35).unwrap(), &[0xFF; 4]);
}

proptest! {
    #[test]
    fn prop_write_then_read_round_trips(
        x in 0i32..60,
        y in 0i32..60,
        w in 1u32..40,
        h in 1u32..40,
        seed in any::<u8>(),
    ) {
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(100, 100));
        let rect = Rect::new(x, y, w, h);
        let pixels: Vec<u8> = (0..rect.area() as usize * 4)
            .map(|i| (i as u8) ^ seed)
            .collect();

        store.write(rect, &pixels, 0).unwrap();
        let snapshot = store.read_region(rect);
        prop_assert_eq!(snapshot.rect(), rect);
        prop_assert_eq!(snapshot.data(), &pixels[..]);
    }
}
