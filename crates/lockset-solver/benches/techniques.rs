//! Micro-benchmarks for the almost locked set machinery.
//!
//! This benchmark suite measures the cost of set enumeration, restricted
//! common detection, chain search, and full technique application on
//! representative puzzle states.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench techniques
//! ```

use std::{cell::RefCell, hint, rc::Rc};

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lockset_core::{Digit, DigitSet, Position};
use lockset_solver::{
    als::{AlsRccCache, ChainSearch, RccMode, RccSet, collect_alss},
    technique::{AlsChain, AlsXz, Technique as _, TechniqueGrid},
};

/// Eight bivalue cells forming a four-set chain across rows 0 and 5.
fn chain_grid() -> TechniqueGrid {
    let mut grid = TechniqueGrid::new();
    grid.set_candidates(Position::new(0, 0), DigitSet::from_iter([Digit::D1, Digit::D9]));
    grid.set_candidates(Position::new(1, 0), DigitSet::from_iter([Digit::D1, Digit::D2]));
    grid.set_candidates(Position::new(4, 0), DigitSet::from_iter([Digit::D2, Digit::D3]));
    grid.set_candidates(Position::new(5, 0), DigitSet::from_iter([Digit::D3, Digit::D4]));
    grid.set_candidates(Position::new(5, 4), DigitSet::from_iter([Digit::D4, Digit::D5]));
    grid.set_candidates(Position::new(5, 5), DigitSet::from_iter([Digit::D5, Digit::D6]));
    grid.set_candidates(Position::new(1, 5), DigitSet::from_iter([Digit::D6, Digit::D8]));
    grid.set_candidates(Position::new(2, 5), DigitSet::from_iter([Digit::D8, Digit::D9]));
    grid
}

/// Two bivalue pairs in column 0 and row 0 forming a single ALS-XZ link.
fn xz_grid() -> TechniqueGrid {
    let mut grid = TechniqueGrid::new();
    grid.set_candidates(Position::new(0, 0), DigitSet::from_iter([Digit::D1, Digit::D9]));
    grid.set_candidates(Position::new(1, 0), DigitSet::from_iter([Digit::D1, Digit::D2]));
    grid.set_candidates(Position::new(0, 4), DigitSet::from_iter([Digit::D2, Digit::D9]));
    grid.set_candidates(Position::new(0, 5), DigitSet::from_iter([Digit::D2, Digit::D8]));
    grid
}

fn bench_collect_alss(c: &mut Criterion) {
    let puzzles = [("chain", chain_grid()), ("empty", TechniqueGrid::new())];

    for (param, grid) in puzzles {
        c.bench_with_input(BenchmarkId::new("collect_alss", param), &grid, |b, grid| {
            b.iter(|| hint::black_box(collect_alss(hint::black_box(grid))));
        });
    }
}

fn bench_rcc_find(c: &mut Criterion) {
    let grid = chain_grid();
    let alss = collect_alss(&grid);

    for mode in [RccMode::Forward, RccMode::AllPairs] {
        c.bench_with_input(
            BenchmarkId::new("rcc_find", format!("{mode:?}")),
            &alss,
            |b, alss| {
                b.iter(|| hint::black_box(RccSet::find(hint::black_box(alss), mode)));
            },
        );
    }
}

fn bench_chain_search(c: &mut Criterion) {
    let grid = chain_grid();
    let alss = collect_alss(&grid);
    let rccs = RccSet::find(&alss, RccMode::AllPairs);

    let searches = [
        ("all_results", ChainSearch::new()),
        ("single_result", ChainSearch::new().with_single_result(true)),
    ];

    for (param, search) in searches {
        c.bench_with_input(
            BenchmarkId::new("chain_search", param),
            &(&alss, &rccs),
            |b, &(alss, rccs)| {
                b.iter(|| hint::black_box(search.run(alss, rccs)));
            },
        );
    }
}

fn bench_als_xz_apply(c: &mut Criterion) {
    let puzzles = [("als_xz", xz_grid()), ("empty", TechniqueGrid::new())];

    for (param, grid) in puzzles {
        c.bench_with_input(BenchmarkId::new("als_xz_apply", param), &grid, |b, grid| {
            let technique = AlsXz::new(Rc::new(RefCell::new(AlsRccCache::new())));
            b.iter_batched_ref(
                || hint::black_box(grid.clone()),
                |grid| {
                    let changed = technique.apply(grid).unwrap();
                    hint::black_box(changed)
                },
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_als_chain_apply(c: &mut Criterion) {
    let puzzles = [("chain", chain_grid()), ("empty", TechniqueGrid::new())];

    for (param, grid) in puzzles {
        c.bench_with_input(
            BenchmarkId::new("als_chain_apply", param),
            &grid,
            |b, grid| {
                let technique = AlsChain::new(Rc::new(RefCell::new(AlsRccCache::new())));
                b.iter_batched_ref(
                    || hint::black_box(grid.clone()),
                    |grid| {
                        let changed = technique.apply(grid).unwrap();
                        hint::black_box(changed)
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

criterion_group!(
    benches,
    bench_collect_alss,
    bench_rcc_find,
    bench_chain_search,
    bench_als_xz_apply,
    bench_als_chain_apply,
);
criterion_main!(benches);
