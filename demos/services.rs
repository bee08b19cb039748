mod inventory {
    use stepseq::sources::Receiving;
    use stepseq::IntoSeq;

    use crossbeam::channel::Sender;
    use indexmap::IndexMap;

    use std::thread;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum State {
        Running,
        Stopped,
    }

    #[derive(Debug, Clone)]
    pub struct Service {
        pub host: &'static str,
        pub name: &'static str,
        pub state: State,
    }

    const SERVICES: [(&str, &str, State); 7] = [
        ("web", "nginx", State::Running),
        ("web", "certbot", State::Stopped),
        ("db", "postgres", State::Running),
        ("db", "backup", State::Stopped),
        ("mail", "postfix", State::Running),
        ("mail", "dovecot", State::Running),
        ("web", "fail2ban", State::Running),
    ];

    /// Report every known service on `tx`, one by one, from a thread of its own.
    pub fn discover() -> (Receiving<Service>, thread::JoinHandle<()>) {
        let (tx, rx) = Receiving::channel();
        let scanner = thread::spawn(move || scan(&tx));
        (rx, scanner)
    }

    fn scan(tx: &Sender<Service>) {
        for (host, name, state) in SERVICES {
            if tx.send(Service { host, name, state }).is_err() {
                log::debug!("nobody is listening anymore, stopping the scan");
                return;
            }
        }
    }

    pub fn by_host(services: Receiving<Service>) -> IndexMap<&'static str, Vec<Service>> {
        services.seq().group_by(|service| service.host)
    }
}

use inventory::{discover, State};

use stepseq::IntoSeq;

fn main() {
    env_logger::init();

    let (services, scanner) = discover();
    for (host, services) in inventory::by_host(services) {
        let stopped = services
            .iter()
            .seq()
            .filter(|service| service.state == State::Stopped)
            .map(|service| service.name)
            .join_str(", ");
        let names = services.seq().map(|service| service.name).join_str(" ");

        if stopped.is_empty() {
            println!("{host}: {names}");
        } else {
            println!("{host}: {names} (stopped: {stopped})");
        }
    }
    scanner.join().unwrap();

    // Stop scanning at the first stopped service.
    let (services, scanner) = discover();
    let first_stopped = services
        .seq()
        .continue_if(|service| service.state == State::Running)
        .map(|service| format!("{}/{}", service.host, service.name))
        .to_list();
    println!("checked until the first stopped service: {}", first_stopped.join(" "));
    scanner.join().unwrap();
}
