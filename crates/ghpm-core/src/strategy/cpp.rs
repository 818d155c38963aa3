//! C and C++ projects built with make or CMake.

use std::path::Path;

use ghpm_schema::{Ecosystem, reason};

use super::{BUILD_SUBDIR, BuildAttempt, BuildPlan, ResolveContext, Strategy, WorkDir};
use crate::files;
use crate::resolver::BinaryCandidate;

/// C and C++ projects driven by Make or CMake.
#[derive(Debug, Default, Clone, Copy)]
pub struct CppStrategy;

const MAKEFILE: &str = "Makefile";
const CMAKE_LISTS: &str = "CMakeLists.txt";

impl Strategy for CppStrategy {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::CCpp
    }

    fn markers(&self) -> &'static [&'static str] {
        &[MAKEFILE, CMAKE_LISTS]
    }

    fn plan(&self, repo_root: &Path) -> BuildPlan {
        let mut attempts = Vec::new();
        if repo_root.join(MAKEFILE).exists() {
            attempts.push(
                BuildAttempt::new("make", &["make"], "make && make install")
                    .then_soft(&["make", "install"], WorkDir::RepoRoot),
            );
        }
        if repo_root.join(CMAKE_LISTS).exists() {
            attempts.push(
                BuildAttempt::new("cmake", &["cmake", ".."], "cmake && make")
                    .in_build_dir()
                    .then(&["make"], WorkDir::BuildSubdir),
            );
        }

        if attempts.is_empty() {
            BuildPlan::Unavailable(reason::NO_BUILD_SYSTEM.to_string())
        } else {
            BuildPlan::Alternates(attempts)
        }
    }

    fn candidates(&self, ctx: &ResolveContext<'_>) -> Vec<BinaryCandidate> {
        let dirs = [
            ctx.repo_root.to_path_buf(),
            ctx.repo_root.join("bin"),
            ctx.repo_root.join(BUILD_SUBDIR),
        ];

        if let Some(named) = dirs
            .iter()
            .map(|d| d.join(ctx.repo_name))
            .find(|p| files::is_executable_file(p))
        {
            return vec![BinaryCandidate::new(named)];
        }

        dirs.iter()
            .flat_map(|d| files::list_files(d))
            .filter(|p| files::is_executable_file(p))
            .map(BinaryCandidate::new)
            .collect()
    }
}
