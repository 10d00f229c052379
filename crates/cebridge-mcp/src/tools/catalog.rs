//! Engine tool catalog.

use super::ParamDefault::{Bool, Int, IntList, Null, Str};
use super::ParamKind::{Address, Boolean, Integer, IntegerList, Number, String};
use super::{ParamSpec as P, ToolSpec as T};

const ADDRESS: P = P::required("address", Address);

pub static CATALOG: &[T] = &[
    // Process and modules
    T::new(
        "get_process_info",
        "Get current process ID, name, modules count and architecture.",
        &[],
    ),
    T::new(
        "enum_modules",
        "List all loaded modules (DLLs) with their base addresses and sizes.",
        &[],
    ),
    T::new(
        "get_thread_list",
        "Get list of threads in the attached process.",
        &[],
    ),
    T::new(
        "get_symbol_address",
        "Resolve a symbol name (e.g., 'Engine.GameEngine') to an address.",
        &[P::required("symbol", String)],
    ),
    T::new(
        "get_address_info",
        "Get symbolic name and module info for an address (reverse of get_symbol_address).",
        &[
            ADDRESS,
            P::optional("include_modules", Boolean, Bool(true)),
            P::optional("include_symbols", Boolean, Bool(true)),
            P::optional("include_sections", Boolean, Bool(false)),
        ],
    ),
    T::new(
        "get_rtti_classname",
        "Try to identify the class name of an object at address using Run-Time Type Information.",
        &[ADDRESS],
    ),
    // Memory reading
    T::new(
        "read_memory",
        "Read raw bytes from memory.",
        &[ADDRESS, P::optional("size", Integer, Int(256))],
    ),
    T::new(
        "read_integer",
        "Read a number from memory. Types: byte, word, dword, qword, float, double.",
        &[ADDRESS, P::optional("type", String, Str("dword"))],
    ),
    T::new(
        "read_string",
        "Read a string from memory (ASCII or Wide/UTF-16).",
        &[
            ADDRESS,
            P::optional("max_length", Integer, Int(256)),
            P::optional("wide", Boolean, Bool(false)),
        ],
    ),
    T::new(
        "read_pointer",
        "Read a pointer chain. Returns the final address and value.",
        &[
            ADDRESS.sent_as("base"),
            P::optional("offsets", IntegerList, IntList(&[0])).empty_is_default(),
        ],
    )
    .calls("read_pointer_chain"),
    T::new(
        "read_pointer_chain",
        "Follow a multi-level pointer chain and return analysis of every step.",
        &[
            P::required("base", Address),
            P::required("offsets", IntegerList),
        ],
    ),
    T::new(
        "checksum_memory",
        "Calculate MD5 checksum of a memory region to detect changes.",
        &[ADDRESS, P::required("size", Integer)],
    ),
    // Scanning and writing
    T::new(
        "scan_all",
        "Unified memory scanner. Types: exact, string, array. Protection: +W-C (writable, not copy-on-write).",
        &[
            P::required("value", String),
            P::optional("type", String, Str("exact")),
            P::optional("protection", String, Str("+W-C")),
        ],
    ),
    T::new(
        "get_scan_results",
        "Get results from the last 'scan_all' operation. Use 'max' to limit output.",
        &[P::optional("max", Integer, Int(100))],
    ),
    T::new(
        "next_scan",
        "Next scan to filter results. Types: exact, increased, decreased, changed, unchanged, bigger, smaller.",
        &[
            P::required("value", String),
            P::optional("scan_type", String, Str("exact")),
        ],
    ),
    T::new(
        "write_integer",
        "Write a number to memory. Types: byte, word, dword, qword, float, double.",
        &[
            ADDRESS,
            P::required("value", Number),
            P::optional("type", String, Str("dword")),
        ],
    ),
    T::new(
        "write_memory",
        "Write raw bytes to memory.",
        &[ADDRESS, P::required("bytes", IntegerList)],
    ),
    T::new(
        "write_string",
        "Write a string to memory (ASCII or Wide/UTF-16).",
        &[
            ADDRESS,
            P::required("value", String),
            P::optional("wide", Boolean, Bool(false)),
        ],
    ),
    T::new(
        "aob_scan",
        "Scan for an Array of Bytes (AOB) pattern. Example: '48 89 5C 24'.",
        &[
            P::required("pattern", String),
            P::optional("protection", String, Str("+X")),
            P::optional("limit", Integer, Int(100)),
        ],
    ),
    T::new(
        "search_string",
        "Quickly search for a text string in memory.",
        &[
            P::required("string", String),
            P::optional("wide", Boolean, Bool(false)),
            P::optional("limit", Integer, Int(100)),
        ],
    ),
    T::new(
        "generate_signature",
        "Generate a unique AOB signature that can find this specific address again.",
        &[ADDRESS],
    ),
    T::new(
        "get_memory_regions",
        "Get list of valid memory regions nearby common bases.",
        &[P::optional("max", Integer, Int(100))],
    ),
    T::new(
        "enum_memory_regions_full",
        "Enumerate ALL memory regions in the process (native EnumMemoryRegions).",
        &[P::optional("max", Integer, Int(500))],
    ),
    // Analysis and disassembly
    T::new(
        "disassemble",
        "Disassemble instructions starting at an address.",
        &[ADDRESS, P::optional("count", Integer, Int(20))],
    ),
    T::new(
        "get_instruction_info",
        "Get detailed info about a single instruction (size, bytes, opcode).",
        &[ADDRESS],
    ),
    T::new(
        "find_function_boundaries",
        "Attempt to find the start and end of a function containing the address.",
        &[ADDRESS, P::optional("max_search", Integer, Int(4096))],
    ),
    T::new(
        "analyze_function",
        "Analyze a function to find all CALL instructions made by it.",
        &[ADDRESS],
    ),
    T::new(
        "find_references",
        "Find instructions that access (reference) this address.",
        &[ADDRESS, P::optional("limit", Integer, Int(50))],
    ),
    T::new(
        "find_call_references",
        "Find all locations that CALL this function.",
        &[
            P::required("function_address", Address).sent_as("address"),
            P::optional("limit", Integer, Int(100)),
        ],
    ),
    T::new(
        "dissect_structure",
        "Use CE's auto-guess feature to interpret memory at address as a structure.",
        &[ADDRESS, P::optional("size", Integer, Int(256))],
    ),
    // Debugging and breakpoints
    T::new(
        "set_breakpoint",
        "Set a hardware execution breakpoint. Non-breaking, logging only.",
        &[
            ADDRESS,
            P::optional("id", String, Null),
            P::optional("capture_registers", Boolean, Bool(true)),
            P::optional("capture_stack", Boolean, Bool(false)),
            P::optional("stack_depth", Integer, Int(16)),
        ],
    ),
    T::new(
        "set_data_breakpoint",
        "Set a hardware data breakpoint (watchpoint). Types: 'r' (read), 'w' (write), 'rw' (access).",
        &[
            ADDRESS,
            P::optional("id", String, Null),
            P::optional("access_type", String, Str("w")),
            P::optional("size", Integer, Int(4)),
        ],
    ),
    T::new(
        "remove_breakpoint",
        "Remove a breakpoint by its ID.",
        &[P::required("id", String)],
    ),
    T::new("list_breakpoints", "List all active breakpoints.", &[]),
    T::new("clear_all_breakpoints", "Remove ALL breakpoints.", &[]),
    T::new(
        "get_breakpoint_hits",
        "Get hits for a specific breakpoint ID (or all if omitted). Set clear=true to flush the buffer.",
        &[
            P::optional("id", String, Null),
            P::optional("clear", Boolean, Bool(false)),
        ],
    ),
    // DBVM hypervisor (ring -1)
    T::new(
        "get_physical_address",
        "Translate a virtual address to a physical address (requires DBVM).",
        &[ADDRESS],
    ),
    T::new(
        "start_dbvm_watch",
        "Start an invisible DBVM hypervisor watch. Modes: 'w' (writes), 'r' (reads), 'x' (execute).",
        &[
            ADDRESS,
            P::optional("mode", String, Str("w")),
            P::optional("max_entries", Integer, Int(1000)),
        ],
    ),
    T::new(
        "stop_dbvm_watch",
        "Stop a DBVM watch and return its results.",
        &[ADDRESS],
    ),
    T::new(
        "poll_dbvm_watch",
        "Poll DBVM watch logs without stopping. Returns register state at each execution hit.",
        &[ADDRESS, P::optional("max_results", Integer, Int(1000))],
    ),
    // Scripting and control
    T::new(
        "evaluate_lua",
        "Execute arbitrary Lua code in Cheat Engine.",
        &[P::required("code", String)],
    ),
    T::new(
        "auto_assemble",
        "Run an AutoAssembler script (injection, code caves, etc).",
        &[P::required("script", String)],
    ),
    T::new("ping", "Check connectivity and get version info.", &[]),
];
