use std::process::Command;

/// Most recent release tag reachable from HEAD, if this is a git checkout.
fn latest_release_tag() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let tag = String::from_utf8(output.stdout).ok()?;
    let tag = tag.trim();
    (!tag.is_empty()).then(|| tag.to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // A new commit or tag changes the version label shown at startup.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
    println!("cargo:rerun-if-env-changed=TOUR_PLANNER_VERSION_TAG");

    let tag = std::env::var("TOUR_PLANNER_VERSION_TAG")
        .ok()
        .filter(|tag| !tag.trim().is_empty())
        .or_else(latest_release_tag);
    if let Some(tag) = tag {
        println!("cargo:rustc-env=GIT_TAG={tag}");
    }
}
