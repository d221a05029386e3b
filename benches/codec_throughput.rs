use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowgate::binary::{BinaryCodecConfig, BinaryEventCodec, ByteOrder};
use flowgate::event_table::EventTable;
use flowgate::json::JsonParameterMapCodec;
use flowgate::parameter_map::{ParameterMap, ParameterMapEntry};
use flowgate::transform::Transform;
use std::io::Cursor;

const PARAMETERS: usize = 12;

fn event_table(number_of_events: usize) -> EventTable {
    let names: Vec<String> = (0..PARAMETERS).map(|p| format!("FL{}-A", p + 1)).collect();
    let columns = (0..PARAMETERS)
        .map(|p| {
            (0..number_of_events)
                .map(|e| ((e * 31 + p * 7) % 262_144) as f32)
                .collect()
        })
        .collect();
    EventTable::from_float_columns(&names, columns).unwrap()
}

fn encoded(table: &EventTable, byte_order: ByteOrder) -> Vec<u8> {
    let mut codec = BinaryEventCodec::with_table(table);
    codec.set_config(BinaryCodecConfig::with_byte_order(byte_order));
    let mut bytes = Vec::new();
    codec.write_to(&mut bytes, None).unwrap();
    bytes
}

fn foreign_byte_order() -> ByteOrder {
    match ByteOrder::native() {
        ByteOrder::Lsbf => ByteOrder::Msbf,
        ByteOrder::Msbf => ByteOrder::Lsbf,
    }
}

fn bench_binary_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_write");

    for number_of_events in [10_000, 100_000] {
        let table = event_table(number_of_events);
        let bytes = (number_of_events * PARAMETERS * 4) as u64;
        group.throughput(Throughput::Bytes(bytes));

        let byte_orders = [("native", ByteOrder::native()), ("swapped", foreign_byte_order())];
        for (label, byte_order) in byte_orders {
            let mut codec = BinaryEventCodec::with_table(&table);
            codec.set_config(BinaryCodecConfig::with_byte_order(byte_order));
            group.bench_with_input(
                BenchmarkId::new(label, number_of_events),
                &number_of_events,
                |b, _| {
                    let mut buffer = Vec::with_capacity(bytes as usize + 4096);
                    b.iter(|| {
                        buffer.clear();
                        codec.write_to(&mut buffer, None).unwrap();
                        black_box(buffer.len())
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_binary_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_read");

    for number_of_events in [10_000, 100_000] {
        let table = event_table(number_of_events);
        group.throughput(Throughput::Bytes((number_of_events * PARAMETERS * 4) as u64));

        let byte_orders = [("native", ByteOrder::native()), ("swapped", foreign_byte_order())];
        for (label, byte_order) in byte_orders {
            let bytes = encoded(&table, byte_order);
            group.bench_with_input(
                BenchmarkId::new(label, number_of_events),
                &bytes,
                |b, bytes| {
                    let mut codec = BinaryEventCodec::new();
                    b.iter(|| {
                        let table = codec.read_from(&mut Cursor::new(bytes), None).unwrap();
                        let number_of_events = table.borrow().number_of_events();
                        black_box(number_of_events)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_binary_header_only(c: &mut Criterion) {
    let bytes = encoded(&event_table(100_000), ByteOrder::native());
    c.bench_function("binary_header_only", |b| {
        let mut codec = BinaryEventCodec::new();
        b.iter(|| {
            let table = codec.read_from(&mut Cursor::new(&bytes), Some(0)).unwrap();
            let number_of_parameters = table.borrow().number_of_parameters();
            black_box(number_of_parameters)
        })
    });
}

fn parameter_map(parameters: usize) -> ParameterMap {
    let mut map = ParameterMap::new();
    map.set_name("benchmark panel");
    for p in 0..parameters {
        let entry = ParameterMapEntry::new(format!("FL{}-A", p + 1))
            .long_name(format!("Marker {}", p + 1))
            .default_transform(Transform::logicle(262144.0, 0.0, 4.5, 0.5));
        map.add_parameter(entry).unwrap();
    }
    map
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("parameter_map_json");

    for parameters in [16, 256] {
        let map = parameter_map(parameters);
        let mut codec = JsonParameterMapCodec::with_map(&map);
        let text = codec.save_to_text(3).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("save", parameters), &parameters, |b, _| {
            b.iter(|| black_box(codec.save_to_text(3).unwrap().len()))
        });

        group.bench_with_input(BenchmarkId::new("load", parameters), &text, |b, text| {
            let mut reader = JsonParameterMapCodec::new();
            b.iter(|| {
                let map = reader.load_from_text(text).unwrap();
                let number_of_parameters = map.borrow().number_of_parameters();
                black_box(number_of_parameters)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_binary_write,
    bench_binary_read,
    bench_binary_header_only,
    bench_json
);
criterion_main!(benches);
