/// 性能数据库访问 - 只读打开 entity_states 所在的 SQLite 文件
use crate::constants::{
    ENTITY_STATES_TABLE, SELECT_OPIDS_SQL, SELECT_STATES_SQL, TABLE_EXISTS_SQL,
};
use crate::error::{DatabaseError, Error, Result};
use crate::model::{EventRecord, OpId};
use log::{debug, info};
use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};

/// 只读的性能数据库句柄
#[derive(Debug)]
pub struct PerfDb {
    path: PathBuf,
    conn: Connection,
}

impl PerfDb {
    /// 只读打开数据库并确认 entity_states 表存在
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening performance database: {}", path.display());

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            Error::Database(DatabaseError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        // 大缓存，减少逐 opid 查询时的页面读取
        conn.pragma_update(None, "cache_size", -256 * 1024)
            .map_err(|e| query_failed("pragma cache_size", e))?;

        let db = Self {
            path: path.to_path_buf(),
            conn,
        };
        db.ensure_table()?;
        Ok(db)
    }

    /// 数据库路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_table(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row(TABLE_EXISTS_SQL, [ENTITY_STATES_TABLE], |row| row.get(0))
            .map_err(|e| query_failed("check table", e))?;
        if count == 0 {
            return Err(Error::Database(DatabaseError::MissingTable {
                path: self.path.clone(),
                table: ENTITY_STATES_TABLE.to_string(),
            }));
        }
        Ok(())
    }

    /// 选出匹配函数标签的 opid
    ///
    /// `fn_tag` 按 SQL LIKE 匹配；结果按每个 opid 首条匹配记录的插入顺序升序。
    /// `limit` 为 `None` 时返回全部匹配；`start_opid` 是 opid 下界，只在有 `limit` 时生效。
    pub fn select_opids(
        &self,
        fn_tag: &str,
        limit: Option<u32>,
        start_opid: i64,
    ) -> Result<Vec<OpId>> {
        let lower = limit.map(|_| start_opid);
        let limit = limit.map_or(-1, i64::from);
        debug!("select opids: fn_tag={fn_tag}, lower={lower:?}, limit={limit}");

        let mut stmt = self
            .conn
            .prepare_cached(SELECT_OPIDS_SQL)
            .map_err(|e| query_failed("prepare opid selection", e))?;
        let rows = stmt
            .query_map(params![fn_tag, lower, limit], |row| row.get::<_, OpId>(0))
            .map_err(|e| query_failed("select opids", e))?;

        let opids = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| query_failed("read opid row", e))?;
        debug!("{} opid(s) selected for {fn_tag}", opids.len());
        Ok(opids)
    }

    /// 读取一个 opid 的全部状态记录（不区分函数标签），按行号升序
    pub fn fetch_states(&self, opid: &OpId) -> Result<Vec<EventRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(SELECT_STATES_SQL)
            .map_err(|e| query_failed("prepare state query", e))?;
        let rows = stmt
            .query_map([opid], EventRecord::from_row)
            .map_err(|e| query_failed("select states", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| query_failed(&format!("read states of opid {opid}"), e))
    }
}

fn query_failed(context: &str, source: rusqlite::Error) -> Error {
    Error::Database(DatabaseError::QueryFailed {
        context: context.to_string(),
        source,
    })
}
