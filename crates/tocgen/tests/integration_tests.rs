mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::*;
use predicates::prelude::*;

fn sample_project() -> TestProject {
    let project = TestProject::with_template().unwrap();

    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    project.file("chapters/intro/overview.rst", &rst_doc(2, "Overview")).unwrap();
    project.file("chapters/intro/welcome.md", &md_doc(1, "Welcome")).unwrap();

    project.chapter("chapters/guide", "User Guide", 2).unwrap();
    project.file("chapters/guide/basics.rst", &rst_doc(1, "Basics")).unwrap();
    project.chapter("chapters/guide/advanced", "Advanced", 3).unwrap();
    project.file("chapters/guide/advanced/tuning.rst", &rst_doc(1, "Tuning")).unwrap();
    project.file("chapters/guide/recipes/cache.rst", &rst_doc(2, "Caching")).unwrap();

    project.file("chapters/guide/setup-a.rst", &rst_include_doc(2, "combined/setup")).unwrap();
    project.file("chapters/guide/setup-b.rst", &rst_include_doc(1, "combined/setup")).unwrap();

    project.file("chapters/scratch/notes.rst", &rst_doc(1, "Notes")).unwrap();
    project
}

#[test]
fn test_generates_all_outputs() {
    let project = sample_project();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert().success().stdout(predicate::str::contains("Master index updated"));

    assert_eq!(
        project.read("chapters/intro/index.rst"),
        "Introduction\n============\n\n.. toctree::\n   :maxdepth: 2\n   \
         :caption: Introduction Content:\n\n   Welcome <welcome>\n   Overview <overview>\n"
    );

    let guide = project.read("chapters/guide/index.rst");
    let expected = "   Basics <basics>\n   Caching <recipes/cache>\n   Advanced <advanced/index>\n";
    assert!(guide.contains(expected));
    assert!(!guide.contains("setup-a"));
    assert!(project.exists("chapters/guide/advanced/index.rst"));
    assert!(!project.exists("chapters/guide/recipes/index.rst"));
    assert!(!project.exists("chapters/scratch/index.rst"));

    assert_eq!(
        project.read("combined/setup.rst"),
        ".. include:: ../chapters/guide/setup-b.rst\n\n.. include:: ../chapters/guide/setup-a.rst\n"
    );

    let master = project.read("index.rst");
    let links = "   chapters/intro/index\n   chapters/guide/index\n";
    assert!(master.contains(&format!(":caption: Contents:\n\n{}\nIndices", links)));
    assert!(!master.contains("scratch"));
}

#[test]
fn test_short_root_flag() {
    let project = sample_project();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("-r").arg(project.root_path());

    cmd.assert().success();
    assert!(project.exists("index.rst"));
}

#[test]
fn test_default_root_is_current_dir() {
    let project = sample_project();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.current_dir(project.root_path());

    cmd.assert().success();
    assert!(project.exists("chapters/intro/index.rst"));
}

#[test]
fn test_missing_chapters_dir_fails() {
    let project = TestProject::new().unwrap();
    project.file("index_template.rst", TEMPLATE).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Chapter root directory not found"));
}

#[test]
fn test_missing_template_reported_without_failing() {
    let project = TestProject::new().unwrap();
    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    project.file("chapters/intro/page.rst", &rst_doc(1, "Page")).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert().success().code(0).stderr(predicate::str::contains("template not found"));
    assert!(project.exists("chapters/intro/index.rst"));
    assert!(!project.exists("index.rst"));
}

#[test]
fn test_missing_placeholder_reported_without_failing() {
    let project = TestProject::with_template().unwrap();
    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    project.file("index_template.rst", "Docs\n====\n").unwrap();
    project.file("index.rst", "kept\n").unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert()
        .success()
        .code(0)
        .stderr(predicate::str::contains("<<DYNAMIC_CHAPTER_LINKS>>"));
    assert_eq!(project.read("index.rst"), "kept\n");
    assert!(project.exists("chapters/intro/index.rst"));
}

#[test]
fn test_markdown_destination_warns() {
    let project = TestProject::with_template().unwrap();
    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    let faq = "---\ncontent_order: 1\ncontent_destination: combined/faq\n---\n";
    project.file("chapters/intro/faq.md", faq).unwrap();
    project.file("chapters/intro/page.rst", &rst_doc(2, "Page")).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Markdown cannot be included"))
        .stdout(predicate::str::contains("included into combined/faq").not());
    assert!(!project.read("chapters/intro/index.rst").contains("faq"));
    assert!(!project.exists("combined/faq.rst"));
}

#[test]
fn test_broken_directive_in_markdown_reported() {
    let project = TestProject::with_template().unwrap();
    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    let notes = "---\ncontent_order: 1\ncontent_title: Notes\n---\n\n\
                 .. metadata::\n   content_destination: [broken\n";
    project.file("chapters/intro/notes.md", notes).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Invalid metadata directive"))
        .stderr(predicate::str::contains("content_destination: [broken"));
}

#[test]
fn test_rerun_with_destination_inside_chapter_is_stable() {
    let project = TestProject::with_template().unwrap();
    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    project.file("chapters/intro/page.rst", &rst_doc(1, "Page")).unwrap();
    let part = rst_include_doc(1, "chapters/intro/combined");
    project.file("chapters/intro/part.rst", &part).unwrap();

    cargo_bin_cmd!("tocgen").arg("-r").arg(project.root_path()).assert().success();
    let first = project.read("chapters/intro/index.rst");
    assert!(project.exists("chapters/intro/combined.rst"));

    cargo_bin_cmd!("tocgen").arg("-r").arg(project.root_path()).assert().success();
    assert_eq!(project.read("chapters/intro/index.rst"), first);
    assert!(!first.contains("combined"));
}

#[test]
fn test_missing_order_warns_but_succeeds() {
    let project = TestProject::with_template().unwrap();
    project.chapter("chapters/intro", "Introduction", 1).unwrap();
    project.file("chapters/intro/aaa.rst", "No metadata here.\n").unwrap();
    project.file("chapters/intro/bbb.rst", &rst_doc(5, "Ordered")).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert().success().stderr(predicate::str::contains("REVIEW REQUIRED"));
    assert!(project.read("chapters/intro/index.rst").ends_with("   Ordered <bbb>\n   aaa\n"));
}

#[test]
fn test_template_env_expansion() {
    let project = TestProject::with_template().unwrap();
    let template = "Release {{ env.TOCGEN_IT_RELEASE }}\n<<DYNAMIC_CHAPTER_LINKS>>";
    project.file("index_template.rst", template).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path()).env("TOCGEN_IT_RELEASE", "4.2");

    cmd.assert().success();
    assert!(project.read("index.rst").starts_with("Release 4.2\n"));
}

#[test]
fn test_config_file_overrides() {
    let project = TestProject::new().unwrap();
    project.file("tocgen.toml", "chapters_dir = \"parts\"\ntoctree_maxdepth = 3\n").unwrap();
    project.file("index_template.rst", TEMPLATE).unwrap();
    project.chapter("parts/one", "One", 1).unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert().success();
    assert!(project.read("parts/one/index.rst").contains(":maxdepth: 3"));
    assert!(project.read("index.rst").contains("   parts/one/index"));
}

#[test]
fn test_invalid_config_fails() {
    let project = TestProject::with_template().unwrap();
    project.file("tocgen.toml", "no_such_key = 1\n").unwrap();

    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--root-dir").arg(project.root_path());

    cmd.assert().failure().code(1).stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_rerun_is_stable() {
    let project = sample_project();

    cargo_bin_cmd!("tocgen").arg("-r").arg(project.root_path()).assert().success();
    let master = project.read("index.rst");
    let guide = project.read("chapters/guide/index.rst");
    let setup = project.read("combined/setup.rst");

    cargo_bin_cmd!("tocgen").arg("-r").arg(project.root_path()).assert().success();
    assert_eq!(project.read("index.rst"), master);
    assert_eq!(project.read("chapters/guide/index.rst"), guide);
    assert_eq!(project.read("combined/setup.rst"), setup);
}

#[test]
fn test_help() {
    let mut cmd = cargo_bin_cmd!("tocgen");
    cmd.arg("--help");

    cmd.assert().success().stdout(predicate::str::contains("--root-dir"));
}
