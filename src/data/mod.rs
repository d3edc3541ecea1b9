//! Data layer: measured datasets, the session cache, and file loading.
//!
//! ```text
//!   instrument export (.csv)            fixed-format sweep (.csv)
//!          │                                     │
//!          ▼                                     ▼
//!   ┌──────────────┐                     ┌─────────────┐
//!   │ load_dataset  │ header detection    │ load_sweep   │ skip N lines,
//!   └──────────────┘ + "freq" column     └─────────────┘ 3 fields/line
//!          │                                     │
//!          ▼                                     ▼
//!   ┌──────────────┐                     ┌─────────────┐
//!   │ DatasetStore  │ name → dataset      │ SweepTrace   │
//!   └──────────────┘ last load wins      └─────────────┘
//! ```

pub mod loader;
pub mod model;
