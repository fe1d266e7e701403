/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use crate::config::AgentConfig;

/// Decides whether an execution is logged and how its stack line looks.
pub trait LogPolicy: Send + Sync {
    /// True if every statement is logged, or the elapsed time reached the slow threshold.
    fn should_log(&self, elapsed_ms: u64) -> bool;

    fn is_log_stack(&self) -> bool;

    fn max_stack_depth(&self) -> usize;

    /// Symbol prefixes a stack frame must match to be kept. Empty keeps every frame.
    fn stack_filters(&self) -> &[String] {
        &[]
    }

    fn compact_stack(&self) -> bool {
        true
    }
}

impl LogPolicy for AgentConfig {
    fn should_log(&self, elapsed_ms: u64) -> bool {
        self.log_sql_always() || elapsed_ms >= self.slow_threshold_ms()
    }

    fn is_log_stack(&self) -> bool {
        self.log_stack()
    }

    fn max_stack_depth(&self) -> usize {
        AgentConfig::max_stack_depth(self)
    }

    fn stack_filters(&self) -> &[String] {
        AgentConfig::stack_filters(self)
    }

    fn compact_stack(&self) -> bool {
        AgentConfig::compact_stack(self)
    }
}
