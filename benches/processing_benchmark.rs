use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use obstacle_processor::processors::DistanceStatistics;
use obstacle_processor::readers::ReportReader;
use obstacle_processor::utils::{normalize, SecondsScale};

// Build a two-table surface segment report with `rows` obstacles
fn create_test_report(rows: usize) -> String {
    let mut report = String::new();
    for i in 0..40 {
        report.push_str(&format!("Preamble line {}\n", i));
    }

    report.push_str("Seg Pos Type IDENT Delta\n");
    report.push_str("------------------------------\n");
    for i in 0..rows {
        report.push_str(&format!("{} A Radio mast {} {}\n", i % 7, 40000 + i, i % 50));
    }
    report.push_str("\n");

    report.push_str("Dist Trk N E H(ft) T Nimi Id\n");
    report.push_str("------------------------------\n");
    for i in 0..rows {
        report.push_str(&format!(
            "{} {:.1} {:03} 60{:02}{:03} 24{:02}{:03} {} M Vesi torni {}\n",
            i + 1,
            i as f64 * 0.1,
            i % 360,
            i % 60,
            i % 600,
            (i * 7) % 60,
            (i * 3) % 600,
            100 + i % 400,
            40000 + i
        ));
    }

    report
}

fn benchmark_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("whole", |b| {
        b.iter(|| normalize(black_box("603015"), SecondsScale::Whole))
    });

    group.bench_function("tenths", |b| {
        b.iter(|| normalize(black_box("6015305"), SecondsScale::Tenths))
    });

    group.finish();
}

fn benchmark_report_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_parsing");
    let reader = ReportReader::new();

    for rows in [100, 1000, 10000].iter() {
        let report = create_test_report(*rows);

        group.bench_with_input(BenchmarkId::new("parse_tables", rows), &report, |b, report| {
            b.iter(|| {
                let tables = reader.parse_tables(black_box(report));
                tables
                    .into_iter()
                    .map(|table| table.into_table(Some(2)).rows.len())
                    .sum::<usize>()
            })
        });
    }

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for count in [100, 10000, 100000].iter() {
        let distances: Vec<f64> = (0..*count).map(|i| ((i * 7919) % 5000) as f64 * 0.37).collect();

        group.bench_with_input(BenchmarkId::new("compute", count), &distances, |b, distances| {
            b.iter(|| DistanceStatistics::compute(black_box(distances)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_normalize,
    benchmark_report_parsing,
    benchmark_statistics
);
criterion_main!(benches);
