//! Python projects: `pip install .`, falling back to `setup.py`.

use std::path::Path;

use ghpm_schema::Ecosystem;

use super::{BuildAttempt, BuildPlan, ResolveContext, Strategy, scan_entry_points};
use crate::resolver::BinaryCandidate;

/// Python projects installed with pip, falling back to `setup.py`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonStrategy;

impl Strategy for PythonStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn markers(&self) -> &'static [&'static str] {
        &["setup.py", "pyproject.toml", "requirements.txt"]
    }

    fn plan(&self, _repo_root: &Path) -> BuildPlan {
        BuildPlan::Fallback(vec![
            BuildAttempt::new("pip", &["pip", "install", "."], "pip install ."),
            BuildAttempt::new(
                "python",
                &["python", "setup.py", "install"],
                "python setup.py install",
            ),
        ])
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        scan_entry_points(ctx.repo_root, ctx.repo_name, &[".py", ".sh"])
    }
}
