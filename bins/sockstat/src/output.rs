//! Output formatting for sockstat.

use serde::Serialize;
use sockdiag::diag::{InetDiagMsg, TcpState, UnixDiagMsg, sock_type_name};

#[derive(Serialize)]
pub struct InetRow {
    pub proto: &'static str,
    pub state: &'static str,
    pub local: String,
    pub remote: String,
    pub uid: u32,
    pub inode: u32,
}

impl InetRow {
    pub fn new(proto: &'static str, msg: &InetDiagMsg) -> Self {
        Self {
            proto,
            state: TcpState::from_u8(msg.state).name(),
            local: msg.local().to_string(),
            remote: msg.remote().to_string(),
            uid: msg.uid.get(),
            inode: msg.inode.get(),
        }
    }
}

#[derive(Serialize)]
pub struct UnixRow {
    pub kind: &'static str,
    pub state: &'static str,
    pub inode: u32,
}

impl UnixRow {
    pub fn new(msg: &UnixDiagMsg) -> Self {
        Self {
            kind: sock_type_name(msg.ty),
            state: TcpState::from_u8(msg.state).name(),
            inode: msg.ino.get(),
        }
    }
}

pub fn print_inet(rows: &[InetRow], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<28} {:<28} {:>8} {:>10}",
        "PROTO", "STATE", "LOCAL", "REMOTE", "UID", "INODE"
    );
    for row in rows {
        println!(
            "{:<6} {:<12} {:<28} {:<28} {:>8} {:>10}",
            row.proto, row.state, row.local, row.remote, row.uid, row.inode
        );
    }
    Ok(())
}

pub fn print_unix(rows: &[UnixRow], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!("{:<10} {:<12} {:>10}", "TYPE", "STATE", "INODE");
    for row in rows {
        println!("{:<10} {:<12} {:>10}", row.kind, row.state, row.inode);
    }
    Ok(())
}
