pub mod bench;
pub mod equivalence;
pub mod mac;
pub mod model;
pub mod moore;
pub mod simulator;
pub mod trace;
pub mod value;

pub use bench::{BenchReport, FixedBench, OutputVerifier, Stimulus};
pub use equivalence::{check_equivalence, first_divergence, Counterexample, EquivalenceConfig, Verdict};
pub use mac::{mac_update, MacInput, MacState};
pub use model::reference_outputs;
pub use moore::{Mac, Moore, MooreMachine};
pub use simulator::*;
pub use value::{Numeric, S9};
