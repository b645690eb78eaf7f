//! Shared fixtures: a temporary dump directory populated with IR dumps.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const CARD_TABLE_BARRIER: &str = r#"
define private hotspotcc void @jeandle.card_table_barrier(ptr addrspace(1) %addr) {
entry:
  %0 = ptrtoint ptr addrspace(1) %addr to i64
  %1 = lshr i64 %0, 9
  %2 = getelementptr inbounds i8, ptr inttoptr (i64 140737488355328 to ptr), i64 %1
  store atomic i8 0, ptr %2 unordered, align 1
  ret void
}
"#;

pub const CONDITIONAL_CARD_TABLE_BARRIER: &str = r#"
define private hotspotcc void @jeandle.card_table_barrier(ptr addrspace(1) %addr) {
entry:
  %0 = ptrtoint ptr addrspace(1) %addr to i64
  %1 = lshr i64 %0, 9
  %2 = getelementptr inbounds i8, ptr inttoptr (i64 140737488355328 to ptr), i64 %1
  %3 = load i8, ptr %2, align 1
  %4 = icmp eq i8 %3, 0
  br i1 %4, label %already_dirty, label %store_dirty

already_dirty:
  ret void

store_dirty:
  store atomic i8 0, ptr %2 unordered, align 1
  br label %already_dirty
}
"#;

pub const VOLATILE: &str = r#"
define hotspotcc void @"TestVolatile_test_()V"(ptr %thread) {
entry:
    %5 =   load atomic i8, ptr addrspace(1) %4 seq_cst,   align 1
    %9 = add i32 %8, 1
    store atomic i32 %9, ptr addrspace(1) %7 unordered, align 4
    store atomic i8 0, ptr addrspace(1) %10 seq_cst, align 1
    ret void
}
"#;

pub const CATCH_PRIMARY: &str = r#"
bci_2_unwind_dest:
  %12 = landingpad i64
          cleanup
"#;

pub const CATCH_OPTIMIZED: &str = r#"
bci_2_unwind_dest:
  %12 = landingpad token
"#;

pub fn write_dump(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

/// A dump directory laid out the way the compiler writes it.
pub fn dump_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    write_dump(
        p,
        "compiler_jeandle_TestCardTableBarrier_testYGC_(Lcompiler_jeandle_TestCardTableBarrier$OldObject;)V-0001.ll",
        CARD_TABLE_BARRIER,
    );
    write_dump(
        p,
        "compiler_jeandle_TestCardTableBarrier_testYGC_(Lcompiler_jeandle_TestCardTableBarrier$OldObject;)V-0002.ll",
        CONDITIONAL_CARD_TABLE_BARRIER,
    );
    write_dump(p, "TestVolatile_test_()V.ll", VOLATILE);
    write_dump(p, "compiler_jeandle_exception_TestCatch_testCatch_()Z.ll", CATCH_PRIMARY);
    write_dump(
        p,
        "compiler_jeandle_exception_TestCatch_testCatch_()Z-optimized.ll",
        CATCH_OPTIMIZED,
    );
    dir
}
