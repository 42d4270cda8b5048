fn main() {
    // Re-run if git HEAD changes so `--version` picks up the new hash
    println!("cargo:rerun-if-changed=.git/HEAD");

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=OPTIMG_GIT_HASH={hash}");
}
