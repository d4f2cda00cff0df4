//! entity_states 记录模型
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;

/// 操作标识：数据库中可能是整数、浮点或文本，按原值回查
#[derive(Debug, Clone, PartialEq)]
pub enum OpId {
    Int(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OpId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for OpId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl FromSql for OpId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(v) => Ok(Self::Int(v)),
            ValueRef::Text(t) => std::str::from_utf8(t)
                .map(|s| Self::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Real(v) => Ok(Self::Real(v)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for OpId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Int(v) => v.to_sql(),
            Self::Real(v) => v.to_sql(),
            Self::Text(s) => s.to_sql(),
        }
    }
}

/// 状态类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateType {
    Init,
    Finish,
    Other(String),
}

impl StateType {
    /// 从原始字符串分类（子串匹配，忽略大小写）
    pub fn classify(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        if lower.contains("finish") {
            Self::Finish
        } else if lower.contains("init") {
            Self::Init
        } else {
            Self::Other(raw.to_string())
        }
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Finish => f.write_str("finish"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// entity_states 表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: i64,
    pub pid: Option<i64>,
    /// 时间戳（微秒）
    pub time: i64,
    pub tsdb_mod: Option<String>,
    pub fn_tag: String,
    pub entity_type: Option<String>,
    pub opid: OpId,
    pub state_type: StateType,
}

impl EventRecord {
    /// 按 SELECT_STATES_SQL 的列顺序读取一行
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let state: String = row.get(7)?;
        Ok(Self {
            id: row.get(0)?,
            pid: row.get(1)?,
            time: row.get(2)?,
            tsdb_mod: row.get(3)?,
            fn_tag: row.get(4)?,
            entity_type: row.get(5)?,
            opid: row.get(6)?,
            state_type: StateType::classify(&state),
        })
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {}, pid: {}, time: {}, tsdb_mod: {}, fn_tag: {}, entity_type: {}, opid: {}, state_type: {}}}",
            self.id,
            self.pid.map(|p| p.to_string()).unwrap_or_default(),
            self.time,
            self.tsdb_mod.as_deref().unwrap_or_default(),
            self.fn_tag,
            self.entity_type.as_deref().unwrap_or_default(),
            self.opid,
            self.state_type
        )
    }
}
