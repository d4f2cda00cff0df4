//! 测试夹具：在临时目录中构造 entity_states 数据库
#![allow(dead_code)]

use cortxfs_hist::constants::{ENTITY_STATES_TABLE, create_table_sql, insert_sql};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

/// (fn_tag, opid, state_type, time)
pub type Event<'a> = (&'a str, i64, &'a str, i64);

pub fn create_db(dir: &Path, events: &[Event<'_>]) -> PathBuf {
    let path = dir.join("cortxfs_perfc.db");
    let conn = Connection::open(&path).expect("open fixture db");
    conn.execute_batch(&create_table_sql(ENTITY_STATES_TABLE))
        .expect("create table");
    let sql = insert_sql(ENTITY_STATES_TABLE);
    for (fn_tag, opid, state, time) in events {
        conn.execute(&sql, params![4242, time, "cfs", fn_tag, "inode", opid, state])
            .expect("insert event");
    }
    path
}

/// 每个 opid 一对 init/finish
pub fn paired_events(fn_tag: &str, pairs: &[(i64, i64, i64)]) -> Vec<(String, i64, String, i64)> {
    let mut events = Vec::new();
    for &(opid, start, finish) in pairs {
        events.push((fn_tag.to_string(), opid, "init".to_string(), start));
        events.push((fn_tag.to_string(), opid, "finish".to_string(), finish));
    }
    events
}

pub fn as_events(owned: &[(String, i64, String, i64)]) -> Vec<Event<'_>> {
    owned
        .iter()
        .map(|(t, o, s, ts)| (t.as_str(), *o, s.as_str(), *ts))
        .collect()
}
