//! sockstat - dump socket state via NETLINK_SOCK_DIAG.
//!
//! A small ss-style tool: builds a diagnostic dump request per family,
//! drives the netlink exchange, and prints the results as a table or JSON.

mod output;

use clap::Parser;
use sockdiag::Connection;
use sockdiag::diag::{InetDiagReqV2, TcpState, UnixDiagReq, udiag_show};

use output::{InetRow, UnixRow};

#[derive(Parser)]
#[command(name = "sockstat", version, about = "Dump socket state via sock_diag")]
struct Cli {
    /// Display TCP sockets.
    #[arg(short = 't', long)]
    tcp: bool,

    /// Display UDP sockets.
    #[arg(short = 'u', long)]
    udp: bool,

    /// Display Unix domain sockets.
    #[arg(short = 'x', long)]
    unix: bool,

    /// Display listening sockets only.
    #[arg(short = 'l', long)]
    listening: bool,

    /// Output in JSON format.
    #[arg(short = 'j', long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut cli = Cli::parse();
    if !cli.tcp && !cli.udp && !cli.unix {
        cli.tcp = true;
    }

    let states = if cli.listening {
        TcpState::Listen.mask()
    } else {
        !0
    };

    let conn = Connection::new()?;

    let mut inet_rows = Vec::new();
    if cli.tcp {
        dump_both_families(&conn, libc::IPPROTO_TCP as u8, states, "tcp", &mut inet_rows)?;
    }
    if cli.udp {
        dump_both_families(&conn, libc::IPPROTO_UDP as u8, states, "udp", &mut inet_rows)?;
    }
    if cli.tcp || cli.udp {
        output::print_inet(&inet_rows, cli.json)?;
    }

    if cli.unix {
        let req = UnixDiagReq::all()
            .states(states)
            .show(udiag_show::NAME | udiag_show::PEER);

        let rows: Vec<UnixRow> = conn.dump_unix(&req)?.iter().map(UnixRow::new).collect();
        output::print_unix(&rows, cli.json)?;
    }

    Ok(())
}

fn dump_both_families(
    conn: &Connection,
    protocol: u8,
    states: u32,
    proto: &'static str,
    rows: &mut Vec<InetRow>,
) -> anyhow::Result<()> {
    for family in [libc::AF_INET, libc::AF_INET6] {
        let req = InetDiagReqV2::all(family as u8, protocol).states(states);

        for msg in conn.dump_inet(&req)? {
            rows.push(InetRow::new(proto, &msg));
        }
    }
    Ok(())
}
