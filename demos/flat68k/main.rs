use std::net::TcpListener;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error>>;

mod emu;

fn main() -> DynResult<()> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom = match args.next() {
        Some(path) => std::fs::read(path)?,
        None => Vec::new(),
    };
    let sockaddr = args.next().unwrap_or_else(|| "127.0.0.1:9001".to_string());

    let mut session = gdbbridge68k::stub::DebugSession::new(emu::Flat68k::new(&rom));

    let sock = TcpListener::bind(&sockaddr)?;
    loop {
        eprintln!("Waiting for a GDB connection on {:?}...", sockaddr);
        let (stream, addr) = sock.accept()?;
        eprintln!("Debugger connected from {}", addr);

        let err = session.run(stream);
        eprintln!("Debugger disconnected: {}", err);
    }
}
