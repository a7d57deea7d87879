#![allow(dead_code)]

use planear::{Key, Operations, OperationsBuilder, RetryPolicy, ExecuteConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub email: String,
    pub name: String,
    pub points: i64,
    pub nickname: Option<String>,
}

pub fn member(email: &str, name: &str, points: i64) -> Member {
    Member {
        email: email.to_string(),
        name: name.to_string(),
        points,
        nickname: None,
    }
}

pub fn by_email(m: &Member) -> Key {
    m.email.clone()
}

pub fn fmt_member(m: &Member) -> String {
    format!("{} <{}>", m.name, m.email)
}

pub fn non_negative(m: &Member) -> Result<(), String> {
    if m.points < 0 {
        return Err("points must be non-negative".to_string());
    }
    Ok(())
}

pub fn remote_of(members: &[Member]) -> HashMap<Key, Member> {
    members.iter().map(|m| (m.email.clone(), m.clone())).collect()
}

/// Writes `members.csv` with the given data rows under `dir`.
pub fn write_csv(dir: &Path, rows: &[&str]) {
    let mut contents = String::from("email,name,points,nickname\n");
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(dir.join("members.csv"), contents).unwrap();
}

pub fn fast_config() -> ExecuteConfig {
    ExecuteConfig {
        parallelism: 2,
        retry: RetryPolicy::immediate(3),
    }
}

pub fn noop_ops<'a>() -> OperationsBuilder<'a, Member> {
    Operations::builder()
        .format_record(fmt_member)
        .format_key(|k| k.to_string())
        .on_add(|_| Ok(()))
        .on_update(|_| Ok(()))
        .on_delete(|_| Ok(()))
}

pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
