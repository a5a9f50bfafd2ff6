use criterion::{Criterion, criterion_group, criterion_main};
use micro_content::content::{ByteBufferContent, MultipartFormContent, StreamContent, UrlEncodedFormContent};
use micro_content::protocol::Content;
use std::hint::black_box;
use std::io::Cursor;

fn build_form(fields: usize, field_size: usize) -> MultipartFormContent {
    let mut form = MultipartFormContent::new();
    for i in 0..fields {
        if i % 2 == 0 {
            form.add(ByteBufferContent::from(vec![b'a'; field_size]), format!("field{i}")).unwrap();
        } else {
            let stream = StreamContent::new(Cursor::new(vec![b'b'; field_size])).unwrap();
            form.add_file(stream, format!("file{i}"), format!("file{i}.bin")).unwrap();
        }
    }
    form
}

fn bench_multipart_length(c: &mut Criterion) {
    let form = build_form(64, 1024);

    c.bench_function("multipart_length", |b| {
        b.iter(|| black_box(form.length().unwrap()));
    });
}

fn bench_multipart_write(c: &mut Criterion) {
    let mut form = build_form(64, 1024);
    let length = form.length().unwrap();
    let mut sink = Vec::with_capacity(usize::try_from(length).unwrap());

    c.bench_function("multipart_write", |b| {
        b.iter(|| {
            sink.clear();
            form.write_to(&mut sink).unwrap();
            black_box(sink.len());
        });
    });
}

fn bench_form_encode(c: &mut Criterion) {
    let pairs: Vec<(String, String)> = (0..32).map(|i| (format!("key {i}"), format!("value & more {i}"))).collect();

    c.bench_function("url_encoded_form", |b| {
        b.iter(|| black_box(UrlEncodedFormContent::new(pairs.iter().map(|(k, v)| (k, v)))));
    });
}

criterion_group!(benches, bench_multipart_length, bench_multipart_write, bench_form_encode);
criterion_main!(benches);
