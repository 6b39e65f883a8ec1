// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod confirm;
pub mod forms;
pub mod ids;
pub mod intent;
pub mod model;
pub mod state;

pub use confirm::*;
pub use forms::*;
pub use ids::*;
pub use intent::*;
pub use model::*;
pub use state::*;
