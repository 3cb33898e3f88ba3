//! Properties of the event stream produced by the block matcher.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use checksums::RollingChecksum;
use checksums::strong::Md4;
use matching::{
    BlockMatcher, BoxError, ChecksumTable, DeltaEvent, DeltaScript, MatchConfig, apply_delta,
    generate_delta,
};
use proptest::prelude::*;
use signature::{SignatureLayout, generate_file_signature};

fn table_for(old: &[u8], config: &MatchConfig) -> Arc<ChecksumTable> {
    let layout = SignatureLayout::new(config.block_length(), config.strong_sum_length());
    let signature =
        generate_file_signature::<Md4, _>(old, layout, config.checksum_seed()).expect("signature");
    Arc::new(ChecksumTable::from_signature(&signature).expect("table"))
}

fn collect(matcher: &mut BlockMatcher) -> Arc<Mutex<Vec<DeltaEvent<'static>>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    matcher.add_listener(move |event: &DeltaEvent<'_>| -> Result<(), BoxError> {
        sink.lock().unwrap().push(event.clone().into_owned());
        Ok(())
    });
    events
}

/// Old version plus a new version derived from it by splicing and editing,
/// so both copies and literals show up.
fn old_and_new() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (
        proptest::collection::vec(any::<u8>(), 0..1_024),
        proptest::collection::vec(any::<u8>(), 0..64),
        any::<prop::sample::Index>(),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(old, insert, at, cut)| {
            let mut new = old.clone();
            if !new.is_empty() {
                let at = at.index(new.len());
                new.splice(at..at, insert.iter().copied());
                let cut = cut.index(new.len());
                new.truncate(new.len() - cut / 4);
            } else {
                new = insert;
            }
            (old, new)
        })
}

fn config_strategy() -> impl Strategy<Value = MatchConfig> {
    (1u32..48, 0usize..96, prop::bool::ANY).prop_map(|(block, extra, seeded)| {
        let builder = MatchConfig::builder(block).chunk_size(block as usize + extra);
        let builder = if seeded {
            builder.checksum_seed(*b"seed")
        } else {
            builder
        };
        builder.build().expect("valid config")
    })
}

proptest! {
    #[test]
    fn events_reconstruct_the_new_version((old, new) in old_and_new(), config in config_strategy()) {
        let table = table_for(&old, &config);
        let script = generate_delta::<RollingChecksum, Md4, _>(&new[..], config, table)
            .expect("delta");

        let mut rebuilt = Vec::new();
        let written = apply_delta(Cursor::new(&old), &script, &mut rebuilt).expect("apply");
        prop_assert_eq!(written, new.len() as u64);
        prop_assert_eq!(rebuilt, new);
    }

    #[test]
    fn events_cover_the_stream_without_gaps((old, new) in old_and_new(), config in config_strategy()) {
        let block = u64::from(config.block_length().get());
        let table = table_for(&old, &config);
        let script = generate_delta::<RollingChecksum, Md4, _>(&new[..], config, table)
            .expect("delta");

        let mut position = 0u64;
        for event in script.events() {
            prop_assert_eq!(event.new_offset(), position);
            prop_assert!(!event.is_empty());
            if let DeltaEvent::Offsets(copy) = event {
                prop_assert!(u64::from(copy.length) <= block);
                prop_assert!(copy.old_offset + u64::from(copy.length) <= old.len() as u64);
            }
            position = event.end();
        }
        prop_assert_eq!(position, new.len() as u64);
    }

    #[test]
    fn slice_and_byte_feeding_emit_identical_events(
        (old, new) in old_and_new(),
        config in config_strategy(),
        split in proptest::collection::vec(1usize..200, 0..8),
    ) {
        let table = table_for(&old, &config);

        let mut by_byte: BlockMatcher = BlockMatcher::new(config.clone(), Arc::clone(&table)).expect("matcher");
        let byte_events = collect(&mut by_byte);
        for &byte in &new {
            by_byte.update_byte(byte).expect("update");
        }
        by_byte.finish().expect("finish");

        let mut by_slice: BlockMatcher = BlockMatcher::new(config, table).expect("matcher");
        let slice_events = collect(&mut by_slice);
        let mut rest = &new[..];
        for len in split {
            let take = len.min(rest.len());
            by_slice.update(&rest[..take]).expect("update");
            rest = &rest[take..];
        }
        by_slice.update(rest).expect("update");
        by_slice.finish().expect("finish");

        prop_assert_eq!(&*byte_events.lock().unwrap(), &*slice_events.lock().unwrap());
    }

    #[test]
    fn identical_input_is_all_copies(
        data in proptest::collection::vec(any::<u8>(), 0..1_024),
        config in config_strategy(),
    ) {
        let table = table_for(&data, &config);
        let script = generate_delta::<RollingChecksum, Md4, _>(&data[..], config, table)
            .expect("delta");

        prop_assert!(script.events().iter().all(|event| !event.is_literal()));
        prop_assert_eq!(script.copy_bytes(), data.len() as u64);
    }

    #[test]
    fn unmatched_short_stream_is_one_literal(
        data in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let config = MatchConfig::builder(16).build().expect("config");
        let table = Arc::new(ChecksumTable::for_config(&config));
        let script = generate_delta::<RollingChecksum, Md4, _>(&data[..], config, table)
            .expect("delta");

        prop_assert_eq!(script.len(), 1);
        prop_assert!(script.events()[0].is_literal());
        prop_assert_eq!(script.events()[0].new_offset(), 0);
        prop_assert_eq!(script.literal_bytes(), data.len() as u64);
    }
}

#[test]
fn empty_stream_produces_empty_script() {
    let config = MatchConfig::builder(8).build().expect("config");
    let table = table_for(b"some old content", &config);
    let script: DeltaScript =
        generate_delta::<RollingChecksum, Md4, _>(std::io::empty(), config, table).expect("delta");
    assert!(script.is_empty());
}

#[test]
fn one_table_serves_concurrent_sessions() {
    let old: Vec<u8> = (0..4_096u32).map(|i| (i % 251) as u8).collect();
    let config = MatchConfig::builder(64).build().expect("config");
    let table = table_for(&old, &config);

    let handles: Vec<_> = (0..4)
        .map(|shift| {
            let table = Arc::clone(&table);
            let config = config.clone();
            let mut new = old.clone();
            new.rotate_left(shift * 100);
            std::thread::spawn(move || {
                let script = generate_delta::<RollingChecksum, Md4, _>(&new[..], config, table)
                    .expect("delta");
                (new, script)
            })
        })
        .collect();

    for handle in handles {
        let (new, script) = handle.join().expect("session thread");
        let mut rebuilt = Vec::new();
        apply_delta(Cursor::new(&old), &script, &mut rebuilt).expect("apply");
        assert_eq!(rebuilt, new);
        assert!(script.copy_bytes() > 0);
    }
}
