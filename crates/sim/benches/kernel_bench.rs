use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use popsynth_sim::stellar::white_dwarf::{helium_efficiency, helium_flash_efficiency, hydrogen_efficiency};
use popsynth_sim::stellar::{AccretionRegime, StellarType, WhiteDwarf};

fn bench_efficiencies(c: &mut Criterion) {
    let mut group = c.benchmark_group("accretion_efficiency");
    let rates: Vec<f64> = (0..100).map(|i| -9.0 + 0.05 * i as f64).collect();

    for mass in [0.6, 1.0, 1.3] {
        group.bench_with_input(BenchmarkId::new("hydrogen", mass), &mass, |b, &mass| {
            b.iter(|| {
                rates
                    .iter()
                    .map(|&r| hydrogen_efficiency(black_box(mass), r))
                    .sum::<f64>()
            })
        });
        group.bench_with_input(BenchmarkId::new("helium", mass), &mass, |b, &mass| {
            b.iter(|| {
                rates
                    .iter()
                    .map(|&r| helium_efficiency(black_box(mass), r) + helium_flash_efficiency(mass, r))
                    .sum::<f64>()
            })
        });
    }

    group.finish();
}

fn bench_white_dwarf_accretion(c: &mut Criterion) {
    c.bench_function("white_dwarf_accrete_to_chandrasekhar", |b| {
        b.iter(|| {
            let Some(mut wd) = WhiteDwarf::new(StellarType::CarbonOxygenWhiteDwarf, 0.8, 0.0142)
            else {
                return 0;
            };
            wd.set_regime(AccretionRegime::HydrogenStableBurning);
            let mut steps = 0;
            while !wd.reached_chandrasekhar_mass() {
                let eta = wd.eta_h(black_box(-6.8));
                wd.accrete(1.0e-3 * eta.max(0.1));
                steps += 1;
            }
            steps
        })
    });
}

criterion_group!(benches, bench_efficiencies, bench_white_dwarf_accretion);
criterion_main!(benches);
