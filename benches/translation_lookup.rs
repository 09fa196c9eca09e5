// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use locale_lens::i18n::{LocaleContext, LocaleDescriptor, TranslationArgs};
use std::hint::black_box;

fn translation_lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("translation_lookup");
    let preferred = LocaleDescriptor::parse_all(["fr-FR"]);
    let args = TranslationArgs::new().with("name", "Ada");

    group.bench_function("memo_hit", |b| {
        let mut context = LocaleContext::with_embedded(&preferred).unwrap();
        context.translate("greeting", Some(&args));
        b.iter(|| black_box(context.translate("greeting", Some(&args))));
    });

    group.bench_function("miss_after_resolve", |b| {
        let mut context = LocaleContext::with_embedded(&preferred).unwrap();
        b.iter(|| {
            context.resolve(&preferred).unwrap();
            black_box(context.translate("greeting", Some(&args)))
        });
    });

    group.finish();
}

criterion_group!(benches, translation_lookup_benchmark);
criterion_main!(benches);
