//! wg-bench: criterion benchmarks for the scoring core (see `benches/`).
