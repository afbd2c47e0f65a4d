#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
extern crate alloc;
#[cfg(target_os = "none")]
extern crate rlibc;

#[cfg(target_os = "none")]
mod boot {
    use alloc::string::String;
    use bootloader_api::{entry_point, BootInfo};
    use core::panic::PanicInfo;

    use onyx_kernel::cmd_executor::{CommandExecutor, CommandResult};
    use onyx_kernel::devices::drivers::ps2_keyboard::{self, ScancodeDecoder};
    use onyx_kernel::framebuffer::Color;
    use onyx_kernel::syscalls::entry::exit_via_syscall;
    use onyx_kernel::{kernel, memory, printcol, println, serial, serial_println, terminal, trap};

    entry_point!(kernel_main);

    const PROMPT: &str = "onyx:$> ";

    fn kernel_main(boot_info: &'static mut BootInfo) -> ! {
        serial::init();
        serial_println!("onyx: serial console on COM1");

        if let Err(e) = memory::init_heap() {
            serial_println!("Failed to init heap: {}", e);
            trap::halt();
        }

        if kernel::init_kernel().is_err() {
            serial_println!("Kernel initialization failed!");
            trap::halt();
        }

        terminal::init(boot_info);

        printcol!(Color::CYAN, "Welcome to Onyx!\n");
        println!("Type 'help' for available commands.\n");
        print_prompt();

        let mut decoder = ScancodeDecoder::new();
        let mut line = String::new();

        loop {
            while let Some(scancode) = ps2_keyboard::dequeue_scancode() {
                let Some(key) = decoder.process_scancode(scancode) else {
                    continue;
                };

                if key.ctrl && key.character == 'c' {
                    line.clear();
                    println!("^C");
                    print_prompt();
                } else if key.ctrl && key.character == 'l' {
                    line.clear();
                    terminal::clear();
                    print_prompt();
                } else if key.character == '\n' {
                    println!();
                    run_command(&line);
                    line.clear();
                    print_prompt();
                } else if key.character == '\x08' {
                    if line.pop().is_some() {
                        terminal::write_bytes(b"\x08");
                    }
                } else {
                    line.push(key.character);
                    echo_char(key.character);
                }
            }

            x86_64::instructions::hlt();
        }
    }

    fn echo_char(ch: char) {
        let mut buf = [0u8; 4];
        terminal::write_bytes(ch.encode_utf8(&mut buf).as_bytes());
    }

    fn print_prompt() {
        printcol!(Color::GREEN, "{}", PROMPT);
    }

    fn run_command(line: &str) {
        match CommandExecutor::execute(line) {
            CommandResult::Output(text) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            CommandResult::Error(text) => printcol!(Color::LIGHT_RED, "{}\n", text),
            CommandResult::Clear => terminal::clear(),
            CommandResult::Exit => {
                println!("Goodbye.");
                exit_via_syscall(0);
            }
        }
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        serial_println!("PANIC : {} | {:?}", info.message(), info.location());
        printcol!(Color::RED, "PANIC : {}\n", info.message());
        trap::halt()
    }
}

// The kernel entry only exists for the bare-metal target; host builds (where
// `cargo test` runs the library tests) get a stub.
#[cfg(not(target_os = "none"))]
fn main() {}
