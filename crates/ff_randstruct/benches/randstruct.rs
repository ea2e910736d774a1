use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::SeedableRng;
use rand::rngs::StdRng;

use ff_randstruct::BuilderConfig;
use ff_randstruct::Generator;
use ff_randstruct::GeneratorConfig;
use ff_randstruct::StructureBuilder;

pub fn build_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("RandStruct");

    let builder = StructureBuilder::new(BuilderConfig::classic().with_lengthmin(100)).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    group.bench_function("Build one classic structure (lengthmin 100).", |b| {
        b.iter(|| {
            let _ = builder.build(&mut rng);
        });
    });

    let mut config = GeneratorConfig::multiloop();
    config.builder.lengthmin = 30;
    let generator = Generator::try_from(&config).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    group.bench_function("Force a multiloop branch point (lengthmin 30).", |b| {
        b.iter(|| {
            let _ = generator.generate(&mut rng);
        });
    });
}

criterion_group!(benches, build_structures);
criterion_main!(benches);
